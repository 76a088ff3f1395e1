//! Exclusive per-task process execution.

use std::process::{ExitStatus, Output, Stdio};
use std::sync::Arc;

use chrono::Utc;
use tokio::process::Command;
use tracing::{debug, warn};
use uuid::Uuid;

use taskloop_config::{EngineConfig, OverlapPolicy};

use crate::metrics::TaskMetrics;
use crate::outcome::{ExecutionRecord, Outcome};
use crate::recorder::OutcomeRecorder;
use crate::task::{Task, TaskKind};

/// Runs tasks and reports their outcomes.
///
/// One executor is shared by every loop in an engine. It holds no per-task
/// state; exclusion lives on the [`Task`] itself.
pub struct Executor {
    shell: String,
    overlap: OverlapPolicy,
    max_pending: usize,
    recorder: Arc<dyn OutcomeRecorder>,
}

impl Executor {
    pub fn new(config: &EngineConfig, recorder: Arc<dyn OutcomeRecorder>) -> Self {
        Self {
            shell: config.shell.clone(),
            overlap: config.overlap,
            max_pending: config.max_pending,
            recorder,
        }
    }

    /// Run one execution attempt of `task` under its exclusion lock.
    ///
    /// Returns the record handed to the recorder, or `None` when the attempt
    /// was dropped because the task was busy. Never fails: process errors
    /// become [`Outcome::Failure`] records.
    pub async fn execute(&self, task: &Task, metrics: &TaskMetrics) -> Option<ExecutionRecord> {
        let Some(_exclusive) = task.acquire(self.overlap, self.max_pending).await else {
            metrics.record_skipped();
            warn!(
                task = %task.identity(),
                pending = task.pending(),
                "Previous run still in progress, skipping tick"
            );
            return None;
        };

        let _in_flight = metrics.start_run();
        let record = self.run(task).await;
        metrics.record_outcome(record.outcome);
        self.recorder.record(&record);
        Some(record)
    }

    /// Run the task's process to completion without taking the lock.
    pub async fn run(&self, task: &Task) -> ExecutionRecord {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        debug!(task = %task.identity(), %run_id, "Starting run");

        let (outcome, detail, exit_code) = match self.command(task) {
            Some(mut cmd) => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
                match cmd.output().await {
                    Ok(output) => classify(&output),
                    Err(e) => (Outcome::Failure, format!("failed to start: {}", e), None),
                }
            }
            None => (Outcome::Failure, "no command to run".to_string(), None),
        };

        ExecutionRecord {
            run_id,
            task: task.identity().to_string(),
            kind: task.kind(),
            outcome,
            detail,
            exit_code,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Build the process for a task.
    ///
    /// Scripts run as `<shell> <path>`. Commands are split on whitespace
    /// into a program and arguments; no shell quoting is applied.
    pub fn command(&self, task: &Task) -> Option<Command> {
        match task.kind() {
            TaskKind::ShellScript => {
                let mut cmd = Command::new(&self.shell);
                cmd.arg(task.identity());
                Some(cmd)
            }
            TaskKind::Command => {
                let mut parts = task.identity().split_whitespace();
                let mut cmd = Command::new(parts.next()?);
                cmd.args(parts);
                Some(cmd)
            }
        }
    }
}

fn classify(output: &Output) -> (Outcome, String, Option<i32>) {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() {
        return (Outcome::Success, stdout, Some(0));
    }

    let mut detail = describe_status(output.status);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        detail.push_str("\n--- stderr ---\n");
        detail.push_str(stderr.trim_end());
    }
    if !stdout.trim().is_empty() {
        detail.push_str("\n--- stdout ---\n");
        detail.push_str(stdout.trim_end());
    }

    (Outcome::Failure, detail, output.status.code())
}

fn describe_status(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exited with status {}", code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("killed by signal {}", signal);
        }
    }

    "terminated without an exit status".to_string()
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
