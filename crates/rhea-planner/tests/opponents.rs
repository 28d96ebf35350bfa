use rhea_core::{Direction, ForwardModel, Ghost, NodeId};
use rhea_maze::{MazeGame, MazeRules};
use rhea_planner::{OpponentModel, PursuitOpponents};

// Junctions at (4,1) and (4,3); (1,1) and (7,3) are corners.
const CROSS: &str = "
#########
#...P...#
#.##.##.#
#.......#
#########
";

fn game() -> MazeGame {
    MazeGame::parse(CROSS, MazeRules::default()).unwrap()
}

fn node(game: &MazeGame, x: usize, y: usize) -> NodeId {
    game.layout().node_at(x, y).unwrap()
}

#[test]
fn hostile_ghost_at_a_junction_closes_in() {
    let mut game = game();
    let junction = node(&game, 4, 3);
    game.place_ghost(Ghost::Blinky, junction, Direction::Left, 0);

    let moves = PursuitOpponents.ghost_moves(&game);

    assert_eq!(*moves.get(Ghost::Blinky), Some(Direction::Up));
}

#[test]
fn edible_ghost_at_a_junction_runs_away() {
    let mut game = game();
    let junction = node(&game, 4, 3);
    game.place_ghost(Ghost::Blinky, junction, Direction::Down, 30);

    let chosen = PursuitOpponents::ghost_move(&game, Ghost::Blinky);

    assert!(matches!(chosen, Some(Direction::Left | Direction::Right)));
    let next = game.neighbour(junction, chosen.unwrap()).unwrap();
    assert!(
        game.shortest_path_distance(next, game.agent_node())
            > game.shortest_path_distance(junction, game.agent_node())
    );
}

#[test]
fn ghost_never_reverses_at_a_junction() {
    let mut game = game();
    let junction = node(&game, 4, 3);
    // Arriving from above means Up is a reverse, even though it is the shortest way.
    game.place_ghost(Ghost::Blinky, junction, Direction::Down, 0);

    let chosen = PursuitOpponents::ghost_move(&game, Ghost::Blinky);

    assert_ne!(chosen, Some(Direction::Up));
    assert!(chosen.is_some());
}

#[test]
fn corridor_ghost_holds_heading() {
    let mut game = game();
    let corridor = node(&game, 2, 3);
    game.place_ghost(Ghost::Blinky, corridor, Direction::Right, 0);

    assert_eq!(PursuitOpponents::ghost_move(&game, Ghost::Blinky), None);
}

#[test]
fn missing_ghost_has_no_move() {
    let game = game();

    let moves = PursuitOpponents.ghost_moves(&game);

    for ghost in Ghost::ALL {
        assert_eq!(*moves.get(ghost), None);
    }
}
