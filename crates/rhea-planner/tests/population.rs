use rhea_core::{Direction, SplitMix64};
use rhea_planner::{CandidatePlan, Population};

fn scored(actions: &[Direction], fitness: f32) -> CandidatePlan {
    let mut plan = CandidatePlan::from_actions(actions.to_vec()).unwrap();
    plan.set_fitness(fitness);
    plan
}

fn population_with_fitness(values: &[f32]) -> Population {
    let mut rng = SplitMix64::new(99);
    let mut population = Population::random(values.len(), 6, &mut rng);
    for (member, &fitness) in population.members_mut().iter_mut().zip(values) {
        member.set_fitness(fitness);
    }
    population
}

#[test]
fn tournament_over_a_triple_picks_the_fittest() {
    let population = population_with_fitness(&[1.0, 3.0, 2.0, -5.0]);

    assert_eq!(population.tournament_of([0, 1, 2]), 1);
    assert_eq!(population.tournament_of([2, 0, 1]), 1);
    assert_eq!(population.tournament_of([3, 2, 0]), 2);
}

#[test]
fn tournament_ties_go_to_the_first_contender() {
    let population = population_with_fitness(&[4.0, 4.0, 4.0]);

    assert_eq!(population.tournament_of([2, 0, 1]), 2);
}

#[test]
fn random_tournament_never_returns_the_worst_of_three() {
    let population = population_with_fitness(&[0.0, 1.0, 2.0]);
    let mut rng = SplitMix64::new(5);

    // With exactly three members every tournament sees all of them.
    for _ in 0..50 {
        assert_eq!(population.tournament(&mut rng).fitness(), 2.0);
    }
}

#[test]
fn elites_are_the_top_members_best_first() {
    let mut population = population_with_fitness(&[1.0, 9.0, 5.0, 7.0, 3.0]);

    let elites: Vec<f32> = population
        .select_elites(3)
        .iter()
        .map(CandidatePlan::fitness)
        .collect();

    assert_eq!(elites, vec![9.0, 7.0, 5.0]);
    assert_eq!(population.best_elite().map(CandidatePlan::fitness), Some(9.0));
}

#[test]
fn repair_copies_the_best_over_the_worst() {
    use Direction::*;
    let mut population = Population::from_members(vec![
        scored(&[Up, Up], 2.0),
        scored(&[Left, Left], 8.0),
        scored(&[Down, Down], -1.0),
        scored(&[Right, Right], 4.0),
    ]);

    let replaced = population.repair();

    assert_eq!(replaced, Some(2));
    assert_eq!(population.members()[2].actions(), &[Left, Left]);
    assert_eq!(population.len(), 4);
}

#[test]
fn reproduction_restores_the_population_size() {
    let mut rng = SplitMix64::new(1234);
    for size in [3usize, 4, 5, 20, 21] {
        for elites in [1usize, 2] {
            if elites >= size {
                continue;
            }
            let mut population = Population::random(size, 8, &mut rng);
            for generation in 0..10 {
                for (i, member) in population.members_mut().iter_mut().enumerate() {
                    member.set_fitness((i * 7 % 5) as f32 + generation as f32);
                }
                population.select_elites(elites);
                population.repair();
                population.reproduce(0.5, &mut rng);

                assert_eq!(population.len(), size, "size {size}, elites {elites}");
                assert!(population.members().iter().all(|m| m.len() == 8));
            }
        }
    }
}

#[test]
fn elites_survive_reproduction_unchanged() {
    let mut population = population_with_fitness(&[1.0, 9.0, 5.0, 7.0, 3.0]);
    let elites = population.select_elites(2).to_vec();
    let mut rng = SplitMix64::new(8);

    population.reproduce(1.0, &mut rng);

    assert_eq!(&population.members()[..2], elites.as_slice());
}

#[test]
fn stats_summarise_member_fitness() {
    let mut population = population_with_fitness(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
    population.select_elites(1);

    let stats = population.stats(3);

    assert_eq!(stats.generation, 3);
    assert_eq!(stats.best, 9.0);
    assert!((stats.mean - 5.0).abs() < 1e-9);
    assert!((stats.std_dev - 2.0).abs() < 1e-9);
    assert_eq!(stats.elite_best, Some(9.0));
}
