#![cfg(all(feature = "planner", feature = "maze"))]

use std::time::Duration;

use rhea::core::{Direction, ForwardModel, GhostMap, Policy, TickContext};
use rhea::maze::{MazeGame, MazeRules};
use rhea::planner::{RheaConfig, RollingHorizonController};

const MAZE: &str = "
#############
#o....#....o#
#.##.###.##.#
#...........#
#.##.#.#.##.#
#....#P#....#
####.#.#.####
#1.........2#
#############
";

#[test]
fn controller_drives_a_maze_game() {
    let config = RheaConfig {
        population_size: 8,
        max_generations: Some(2),
        ..RheaConfig::default()
    };
    let mut controller = RollingHorizonController::<MazeGame>::new(config).unwrap();
    let mut game = MazeGame::parse(MAZE, MazeRules::default()).unwrap();
    let start_time = game.current_time();

    for tick in 0..20u64 {
        if game.is_game_over() {
            break;
        }
        let action = controller.choose_action(&TickContext::new(tick, 11), &game, Duration::from_secs(5));
        assert_ne!(action, Direction::Neutral);
        game.advance(action, &GhostMap::default());
    }

    assert!(game.current_time() > start_time);
    assert!(controller.last_report().is_some());
}
