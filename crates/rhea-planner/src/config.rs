//! Planner configuration, loadable from YAML.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Search and execution parameters for one controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RheaConfig {
    /// Macro-actions per plan.
    #[serde(default = "default_plan_length")]
    pub plan_length: usize,

    #[serde(default = "default_population_size")]
    pub population_size: usize,

    /// Per-gene probability of mutation, in `[0, 1]`.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f32,

    /// Members carried unmodified into the next generation.
    #[serde(default = "default_elite_count")]
    pub elite_count: usize,

    /// Upper bound on one controller search. A host's per-tick budget can only shorten it.
    #[serde(default = "default_time_budget_ms")]
    pub time_budget_ms: u64,

    /// Hard cap on generations per search. Makes searches reproducible in
    /// tests and benchmarks regardless of machine speed.
    #[serde(default)]
    pub max_generations: Option<u32>,

    /// Upper bound on simulation ticks spent inside one macro-action.
    #[serde(default = "default_max_macro_ticks")]
    pub max_macro_ticks: u32,

    #[serde(default)]
    pub fitness: FitnessConfig,
}

fn default_plan_length() -> usize {
    10
}
fn default_population_size() -> usize {
    20
}
fn default_mutation_rate() -> f32 {
    0.5
}
fn default_elite_count() -> usize {
    1
}
fn default_time_budget_ms() -> u64 {
    40
}
fn default_max_macro_ticks() -> u32 {
    200
}

impl Default for RheaConfig {
    fn default() -> Self {
        Self {
            plan_length: default_plan_length(),
            population_size: default_population_size(),
            mutation_rate: default_mutation_rate(),
            elite_count: default_elite_count(),
            time_budget_ms: default_time_budget_ms(),
            max_generations: None,
            max_macro_ticks: default_max_macro_ticks(),
            fitness: FitnessConfig::default(),
        }
    }
}

impl RheaConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.plan_length == 0 {
            return Err(ConfigError::invalid("plan_length", "must be at least 1"));
        }
        // Tournament selection draws three distinct members.
        if self.population_size < 3 {
            return Err(ConfigError::invalid(
                "population_size",
                format!("must be at least 3, got {}", self.population_size),
            ));
        }
        if self.elite_count == 0 || self.elite_count >= self.population_size {
            return Err(ConfigError::invalid(
                "elite_count",
                format!(
                    "must be in 1..{}, got {}",
                    self.population_size, self.elite_count
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::invalid(
                "mutation_rate",
                format!("must be in [0, 1], got {}", self.mutation_rate),
            ));
        }
        if self.max_macro_ticks == 0 {
            return Err(ConfigError::invalid("max_macro_ticks", "must be at least 1"));
        }
        if self.max_generations == Some(0) {
            return Err(ConfigError::invalid("max_generations", "must be at least 1"));
        }
        self.fitness.validate()
    }
}

/// Inclusive bounds applied to the raw score before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessBounds {
    pub min: f32,
    pub max: f32,
}

/// Reward weights and post-processing for plan evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    #[serde(default = "default_pill_reward")]
    pub pill_reward: f32,

    #[serde(default = "default_power_pill_reward")]
    pub power_pill_reward: f32,

    /// Multiplier on the points awarded for each ghost eaten.
    #[serde(default = "default_ghost_reward_scale")]
    pub ghost_reward_scale: f32,

    /// Fitness of any plan during which the agent is eaten.
    #[serde(default = "default_death_sentinel")]
    pub death_sentinel: f32,

    /// Divide pill rewards at macro-action `j` by `j + 1`.
    #[serde(default = "default_discount_by_step")]
    pub discount_by_step: bool,

    /// Rescale the raw score to `(v + 1) / (max + 1)`.
    #[serde(default)]
    pub normalize_max: Option<f32>,

    #[serde(default)]
    pub clamp: Option<FitnessBounds>,
}

fn default_pill_reward() -> f32 {
    10.0
}
fn default_power_pill_reward() -> f32 {
    50.0
}
fn default_ghost_reward_scale() -> f32 {
    1.0
}
fn default_death_sentinel() -> f32 {
    -50_000.0
}
fn default_discount_by_step() -> bool {
    true
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            pill_reward: default_pill_reward(),
            power_pill_reward: default_power_pill_reward(),
            ghost_reward_scale: default_ghost_reward_scale(),
            death_sentinel: default_death_sentinel(),
            discount_by_step: default_discount_by_step(),
            normalize_max: None,
            clamp: None,
        }
    }
}

impl FitnessConfig {
    /// Turn an accumulated raw reward into a fitness value.
    pub fn finish(&self, raw: f32) -> f32 {
        let mut value = raw;
        if let Some(bounds) = self.clamp {
            value = value.clamp(bounds.min, bounds.max);
        }
        if let Some(max) = self.normalize_max {
            value = (value + 1.0) / (max + 1.0);
        }
        value
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("fitness.pill_reward", self.pill_reward),
            ("fitness.power_pill_reward", self.power_pill_reward),
            ("fitness.ghost_reward_scale", self.ghost_reward_scale),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
        }
        if let Some(bounds) = self.clamp {
            if bounds.min.is_nan() || bounds.max.is_nan() || bounds.min > bounds.max {
                return Err(ConfigError::invalid(
                    "fitness.clamp",
                    format!("min {} exceeds max {}", bounds.min, bounds.max),
                ));
            }
        }
        if let Some(max) = self.normalize_max {
            if !max.is_finite() || max <= -1.0 {
                return Err(ConfigError::invalid(
                    "fitness.normalize_max",
                    format!("must be finite and greater than -1, got {max}"),
                ));
            }
        }
        if !self.death_sentinel.is_finite() {
            return Err(ConfigError::invalid("fitness.death_sentinel", "must be finite"));
        }
        // Rewards are non-negative, so a surviving plan never scores below `finish(0)`.
        let floor = self.finish(0.0);
        if self.death_sentinel >= floor {
            return Err(ConfigError::invalid(
                "fitness.death_sentinel",
                format!(
                    "must be below the lowest surviving fitness {floor}, got {}",
                    self.death_sentinel
                ),
            ));
        }
        Ok(())
    }
}
