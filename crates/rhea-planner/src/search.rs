use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rhea_core::{DeterministicRng, ForwardModel};

use crate::config::RheaConfig;
use crate::error::Result;
use crate::evaluator::FitnessEvaluator;
use crate::opponents::OpponentModel;
use crate::plan::CandidatePlan;
use crate::population::Population;
use crate::report::SearchReport;

/// Shared abort flag. The host may trip it from any thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Complete {
        plan: CandidatePlan,
        report: SearchReport,
    },
    /// Aborted through the [`CancelToken`]; no plan is returned.
    Cancelled { report: SearchReport },
}

impl SearchOutcome {
    pub fn plan(&self) -> Option<&CandidatePlan> {
        match self {
            SearchOutcome::Complete { plan, .. } => Some(plan),
            SearchOutcome::Cancelled { .. } => None,
        }
    }

    pub fn report(&self) -> &SearchReport {
        match self {
            SearchOutcome::Complete { report, .. } | SearchOutcome::Cancelled { report } => report,
        }
    }
}

/// Time-boxed generational search over [`CandidatePlan`]s.
///
/// Every invocation starts from a fresh random population. At least one
/// generation is always evaluated; the deadline is checked after each one.
#[derive(Debug, Clone)]
pub struct RollingHorizonSearch {
    config: RheaConfig,
    evaluator: FitnessEvaluator,
    cancel: Option<CancelToken>,
}

impl RollingHorizonSearch {
    pub fn new(config: RheaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            evaluator: FitnessEvaluator::new(&config),
            config,
            cancel: None,
        })
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &RheaConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Evolve plans against clones of `root` for roughly `budget`.
    ///
    /// # Panics
    ///
    /// If a completed generation yields no elite, which the validated
    /// configuration rules out.
    pub fn run<M, O, R>(&self, root: &M, opponents: &mut O, rng: &mut R, budget: Duration) -> SearchOutcome
    where
        M: ForwardModel,
        O: OpponentModel<M> + ?Sized,
        R: DeterministicRng + ?Sized,
    {
        let started = Instant::now();
        let deadline = started + budget;
        let mut report = SearchReport {
            budget,
            ..SearchReport::default()
        };

        let mut population = Population::random(self.config.population_size, self.config.plan_length, rng);
        let mut generation = 0u32;

        loop {
            for member in population.members_mut() {
                if self.is_cancelled() {
                    report.elapsed = started.elapsed();
                    tracing::debug!(generation, "search cancelled");
                    return SearchOutcome::Cancelled { report };
                }
                let evaluation = self.evaluator.evaluate(member, root.clone(), 0, opponents);
                member.set_fitness(evaluation.fitness);
            }

            population.select_elites(self.config.elite_count);
            population.repair();

            let stats = population.stats(generation);
            tracing::debug!(
                generation,
                best = stats.best,
                mean = stats.mean,
                std_dev = stats.std_dev,
                elapsed_us = started.elapsed().as_micros() as u64,
                "generation evaluated"
            );
            report.generations.push(stats);
            generation += 1;

            let out_of_time = Instant::now() >= deadline;
            let out_of_generations = self
                .config
                .max_generations
                .is_some_and(|max| generation >= max);
            if out_of_time || out_of_generations {
                break;
            }
            population.reproduce(self.config.mutation_rate, rng);
        }

        report.elapsed = started.elapsed();
        report.overran = report.elapsed > budget;
        if report.overran {
            tracing::warn!(
                budget_ms = budget.as_millis() as u64,
                elapsed_ms = report.elapsed.as_millis() as u64,
                generations = generation,
                "search overran its budget"
            );
        }

        let plan = population
            .best_elite()
            .cloned()
            .expect("a completed generation always has an elite");
        SearchOutcome::Complete { plan, report }
    }
}
