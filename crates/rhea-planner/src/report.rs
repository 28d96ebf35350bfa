use std::io::{self, Write};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenerationStats {
    pub generation: u32,
    pub best: f32,
    pub mean: f64,
    /// Population standard deviation of member fitness.
    pub std_dev: f64,
    pub elite_best: Option<f32>,
}

/// Outcome statistics of one search invocation.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchReport {
    pub generations: Vec<GenerationStats>,
    pub elapsed: Duration,
    pub budget: Duration,
    /// The search returned later than its budget allowed.
    pub overran: bool,
}

impl SearchReport {
    pub fn generation_count(&self) -> u32 {
        self.generations.len() as u32
    }

    pub fn best_fitness(&self) -> Option<f32> {
        self.generations.last().and_then(|g| g.elite_best)
    }

    /// `generation,average,stdev` rows, one per generation, with a header line.
    pub fn write_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "generation,average,stdev")?;
        for stats in &self.generations {
            writeln!(out, "{},{},{}", stats.generation, stats.mean, stats.std_dev)?;
        }
        Ok(())
    }
}
