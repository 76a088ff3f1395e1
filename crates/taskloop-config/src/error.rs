//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid duration {input:?}: {reason}")]
    InvalidDuration { input: String, reason: String },

    #[error("Negative duration {0:?}: tasks can only be scheduled forward in time")]
    NegativeDuration(String),

    #[error("Got {tasks} tasks but {durations} durations; each task needs exactly one duration")]
    MismatchedLengths { tasks: usize, durations: usize },

    #[error("Invalid task row {line}: {reason}")]
    InvalidRow { line: usize, reason: String },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl ConfigError {
    pub(crate) fn invalid_duration(input: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidDuration {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
