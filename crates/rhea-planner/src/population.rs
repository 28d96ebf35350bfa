use rhea_core::DeterministicRng;

use crate::plan::CandidatePlan;
use crate::report::GenerationStats;

/// Members of one search invocation plus the elites of the latest evaluated generation.
///
/// The member count is fixed at construction and restored by every [`Population::reproduce`].
#[derive(Debug, Clone)]
pub struct Population {
    size: usize,
    members: Vec<CandidatePlan>,
    elites: Vec<CandidatePlan>,
}

impl Population {
    pub fn random<R: DeterministicRng + ?Sized>(size: usize, plan_length: usize, rng: &mut R) -> Self {
        let members = (0..size)
            .map(|_| CandidatePlan::random(plan_length, rng))
            .collect();
        Self::from_members(members)
    }

    pub fn from_members(members: Vec<CandidatePlan>) -> Self {
        Self {
            size: members.len(),
            members,
            elites: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[CandidatePlan] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [CandidatePlan] {
        &mut self.members
    }

    pub fn elites(&self) -> &[CandidatePlan] {
        &self.elites
    }

    /// Best elite of the latest evaluated generation.
    pub fn best_elite(&self) -> Option<&CandidatePlan> {
        self.elites.first()
    }

    /// Record the top `count` members by fitness, best first. Ties keep member order.
    pub fn select_elites(&mut self, count: usize) -> &[CandidatePlan] {
        let mut order: Vec<usize> = (0..self.members.len()).collect();
        order.sort_by(|&a, &b| {
            self.members[b]
                .fitness()
                .total_cmp(&self.members[a].fitness())
        });
        self.elites = order
            .into_iter()
            .take(count)
            .map(|i| self.members[i].clone())
            .collect();
        &self.elites
    }

    /// Overwrite the worst member with a copy of the best one.
    ///
    /// Returns the overwritten index.
    pub fn repair(&mut self) -> Option<usize> {
        let best = self.index_by(|candidate, current| candidate > current)?;
        let worst = self.index_by(|candidate, current| candidate <= current)?;
        if best != worst {
            self.members[worst] = self.members[best].clone();
        }
        Some(worst)
    }

    fn index_by(&self, better: impl Fn(f32, f32) -> bool) -> Option<usize> {
        let mut found: Option<usize> = None;
        for (i, member) in self.members.iter().enumerate() {
            match found {
                Some(j) if !better(member.fitness(), self.members[j].fitness()) => {}
                _ => found = Some(i),
            }
        }
        found
    }

    /// Index of the fittest of three members. Ties go to the earlier entry of `contenders`.
    pub fn tournament_of(&self, contenders: [usize; 3]) -> usize {
        let mut winner = contenders[0];
        for &index in &contenders[1..] {
            if self.members[index].fitness() > self.members[winner].fitness() {
                winner = index;
            }
        }
        winner
    }

    /// Tournament over three distinct, uniformly drawn members.
    ///
    /// # Panics
    ///
    /// If the population has fewer than three members.
    pub fn tournament<R: DeterministicRng + ?Sized>(&self, rng: &mut R) -> &CandidatePlan {
        let n = self.members.len();
        assert!(n >= 3, "tournament selection needs at least three members, got {n}");
        let a = rng.next_below(n);
        let mut b = rng.next_below(n);
        while b == a {
            b = rng.next_below(n);
        }
        let mut c = rng.next_below(n);
        while c == a || c == b {
            c = rng.next_below(n);
        }
        &self.members[self.tournament_of([a, b, c])]
    }

    /// Replace the members with the elites plus tournament-bred, mutated offspring.
    pub fn reproduce<R: DeterministicRng + ?Sized>(&mut self, mutation_rate: f32, rng: &mut R) {
        let mut next = Vec::with_capacity(self.size);
        next.extend(self.elites.iter().take(self.size).cloned());
        while next.len() < self.size {
            let (mut first, mut second) = {
                let mother = self.tournament(rng);
                let father = self.tournament(rng);
                mother.crossover(father, rng)
            };
            first.mutate(mutation_rate, rng);
            second.mutate(mutation_rate, rng);
            next.push(first);
            if next.len() < self.size {
                next.push(second);
            }
        }
        self.members = next;
    }

    /// Fitness summary of the current members.
    pub fn stats(&self, generation: u32) -> GenerationStats {
        let n = self.members.len().max(1) as f64;
        let mean = self.members.iter().map(|m| m.fitness() as f64).sum::<f64>() / n;
        let variance = self
            .members
            .iter()
            .map(|m| {
                let d = m.fitness() as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let best = self
            .members
            .iter()
            .map(CandidatePlan::fitness)
            .fold(f32::NEG_INFINITY, f32::max);
        GenerationStats {
            generation,
            best,
            mean,
            std_dev: variance.sqrt(),
            elite_best: self.best_elite().map(CandidatePlan::fitness),
        }
    }
}
