use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`RheaConfig`](crate::RheaConfig).
///
/// Planning itself never fails: infeasible moves, budget exhaustion, game over
/// and cancellation all resolve to a plan or to `Direction::Neutral`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
