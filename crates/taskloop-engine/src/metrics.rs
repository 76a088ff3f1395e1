//! Per-task run counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

/// Counters for one task.
#[derive(Debug, Default)]
pub struct TaskMetrics {
    task: String,

    /// Timer ticks fired.
    pub ticks: AtomicU64,

    /// Executions that acquired the lock and started a process.
    pub started: AtomicU64,

    pub succeeded: AtomicU64,

    pub failed: AtomicU64,

    /// Ticks dropped because the task was busy.
    pub skipped: AtomicU64,

    /// Executions currently running.
    pub in_flight: AtomicU64,

    /// Highest `in_flight` ever observed.
    pub max_in_flight: AtomicU64,
}

impl TaskMetrics {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            ..Default::default()
        }
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Mark an execution as started; it counts as in flight until the guard drops.
    pub fn start_run(&self) -> InFlightGuard<'_> {
        self.started.fetch_add(1, Ordering::Relaxed);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlightGuard { metrics: self }
    }

    pub fn record_outcome(&self, outcome: Outcome) {
        match outcome {
            Outcome::Success => self.succeeded.fetch_add(1, Ordering::Relaxed),
            Outcome::Failure => self.failed.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> TaskMetricsSnapshot {
        TaskMetricsSnapshot {
            task: self.task.clone(),
            ticks: self.ticks.load(Ordering::Relaxed),
            started: self.started.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            in_flight: self.in_flight.load(Ordering::SeqCst),
            max_in_flight: self.max_in_flight.load(Ordering::SeqCst),
        }
    }
}

/// Decrements `in_flight` when the execution ends, however it ends.
pub struct InFlightGuard<'a> {
    metrics: &'a TaskMetrics,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.metrics.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Snapshot of task metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMetricsSnapshot {
    pub task: String,
    pub ticks: u64,
    pub started: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub skipped: u64,
    pub in_flight: u64,
    pub max_in_flight: u64,
}

impl TaskMetricsSnapshot {
    /// Finished executions.
    pub fn completed(&self) -> u64 {
        self.succeeded + self.failed
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
