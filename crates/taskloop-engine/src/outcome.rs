//! Execution outcomes.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::task::TaskKind;

/// Classification of one execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The process exited with status 0.
    Success,
    /// The process could not start, exited non-zero, or was killed.
    Failure,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Failure => write!(f, "failure"),
        }
    }
}

/// The record produced by exactly one execution attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub run_id: Uuid,

    /// Identity of the task that ran.
    pub task: String,

    pub kind: TaskKind,

    pub outcome: Outcome,

    /// Captured stdout on success, error description on failure.
    pub detail: String,

    /// Exit code, when the process exited normally.
    pub exit_code: Option<i32>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExecutionRecord {
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    /// Wall-clock run time.
    pub fn duration(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}
