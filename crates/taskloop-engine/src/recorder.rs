//! Outcome recorders.

use parking_lot::Mutex;
use tracing::{error, info};

use crate::outcome::{ExecutionRecord, Outcome};

/// Receives one record per execution attempt.
///
/// Called from the executing task while it still holds the task's
/// exclusion lock, so implementations should not block for long.
pub trait OutcomeRecorder: Send + Sync {
    fn record(&self, record: &ExecutionRecord);
}

/// Writes each record as one readable log line.
///
/// Events go to the `taskloop::outcome` target, so they can be filtered
/// separately from engine diagnostics. Line breaks inside the detail are
/// written as a literal `\n`, keeping the structured fields on the same
/// line as the message.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRecorder;

impl OutcomeRecorder for TracingRecorder {
    fn record(&self, record: &ExecutionRecord) {
        let duration_ms = record.duration().as_millis() as u64;
        let detail = single_line(&record.detail);
        match record.outcome {
            Outcome::Success => info!(
                target: "taskloop::outcome",
                task = %record.task,
                run_id = %record.run_id,
                kind = %record.kind,
                duration_ms,
                "{} - {}",
                record.task,
                detail
            ),
            Outcome::Failure => error!(
                target: "taskloop::outcome",
                task = %record.task,
                run_id = %record.run_id,
                kind = %record.kind,
                duration_ms,
                exit_code = ?record.exit_code,
                "{} - ERROR: {}",
                record.task,
                detail
            ),
        }
    }
}

/// Trim trailing whitespace and escape the remaining line breaks.
fn single_line(detail: &str) -> String {
    detail
        .trim_end()
        .replace("\r\n", "\\n")
        .replace(['\n', '\r'], "\\n")
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    records: Mutex<Vec<ExecutionRecord>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records so far, in completion order.
    pub fn records(&self) -> Vec<ExecutionRecord> {
        self.records.lock().clone()
    }

    /// Records for one task.
    pub fn records_for(&self, task: &str) -> Vec<ExecutionRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.task == task)
            .cloned()
            .collect()
    }

    /// Count of records for `task` with the given outcome.
    pub fn count(&self, task: &str, outcome: Outcome) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|r| r.task == task && r.outcome == outcome)
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl OutcomeRecorder for MemoryRecorder {
    fn record(&self, record: &ExecutionRecord) {
        self.records.lock().push(record.clone());
    }
}

#[cfg(test)]
#[path = "recorder_tests.rs"]
mod tests;
