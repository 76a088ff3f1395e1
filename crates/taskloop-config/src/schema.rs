//! Configuration schema definitions.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::duration::parse_duration;
use crate::error::ConfigError;
use crate::sources::TaskSpec;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub tasks: Vec<TaskEntry>,
}

impl Config {
    /// Convert the `[[tasks]]` entries into validated task specs.
    pub fn task_specs(&self) -> Result<Vec<TaskSpec>, ConfigError> {
        self.tasks.iter().map(TaskEntry::to_spec).collect()
    }
}

/// What a tick does when the previous run of the same task is still going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Wait for the running execution, no matter how many ticks pile up.
    Block,
    /// Wait only while the per-task queue has room, otherwise drop the tick.
    Skip,
}

impl Default for OverlapPolicy {
    fn default() -> Self {
        OverlapPolicy::Skip
    }
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapPolicy::Block => write!(f, "block"),
            OverlapPolicy::Skip => write!(f, "skip"),
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(OverlapPolicy::Block),
            "skip" => Ok(OverlapPolicy::Skip),
            other => Err(ConfigError::InvalidValue {
                field: "engine.overlap".to_string(),
                message: format!("expected \"block\" or \"skip\", got {:?}", other),
            }),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Overlap policy for ticks that fire while a run is in flight.
    #[serde(default)]
    pub overlap: OverlapPolicy,

    /// Attempts allowed to wait behind a running execution under `skip`.
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,

    /// Interpreter for `.sh` tasks.
    #[serde(default = "default_shell")]
    pub shell: String,
}

fn default_max_pending() -> usize {
    1
}

fn default_shell() -> String {
    "bash".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            overlap: OverlapPolicy::default(),
            max_pending: default_max_pending(),
            shell: default_shell(),
        }
    }
}

impl EngineConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shell.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "engine.shell".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Log file rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log file the outcome records are appended to.
    #[serde(default = "default_log_file")]
    pub file: PathBuf,

    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub rotation: LogRotation,

    /// Also log to the terminal.
    #[serde(default = "default_console")]
    pub console: bool,
}

pub const DEFAULT_LOG_FILE: &str = "./task-scheduler.log";

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_console() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_log_level(),
            rotation: LogRotation::default(),
            console: default_console(),
        }
    }
}

/// One `[[tasks]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEntry {
    /// Command line or script path.
    pub run: String,

    /// Interval between runs, e.g. `"30s"`.
    pub every: String,
}

impl TaskEntry {
    pub fn to_spec(&self) -> Result<TaskSpec, ConfigError> {
        let interval = parse_duration(&self.every)?;
        Ok(TaskSpec::new(self.run.trim(), interval))
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
