//! Error types for the engine.
//!
//! Only startup can fail. Failed runs are reported as
//! [`Outcome::Failure`](crate::Outcome::Failure) records, never as errors.

use std::time::Duration;

use thiserror::Error;

use taskloop_config::ConfigError;

/// Errors that stop the engine from starting.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No tasks were supplied.
    #[error("No tasks to schedule")]
    EmptyTaskSet,

    /// A task has a blank command or script path.
    #[error("Task has an empty command")]
    EmptyIdentity,

    /// A task interval is zero.
    #[error("Task {task:?} has a non-positive interval ({interval:?})")]
    NonPositiveInterval { task: String, interval: Duration },

    /// Engine configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
