//! Per-task timer loops.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use taskloop_config::format_duration;

use crate::executor::Executor;
use crate::metrics::TaskMetrics;
use crate::outcome::ExecutionRecord;
use crate::task::Task;

/// Fires an execution attempt for one task every interval.
///
/// The loop never waits for an attempt to finish: each tick spawns the
/// attempt and goes straight back to the timer. What happens when the
/// previous run is still going is decided by the executor's overlap policy.
pub struct TaskLoop {
    task: Arc<Task>,
    executor: Arc<Executor>,
    metrics: Arc<TaskMetrics>,
}

impl TaskLoop {
    pub fn new(task: Arc<Task>, executor: Arc<Executor>) -> Self {
        let metrics = Arc::new(TaskMetrics::new(task.identity()));
        Self {
            task,
            executor,
            metrics,
        }
    }

    pub fn task(&self) -> &Arc<Task> {
        &self.task
    }

    pub fn metrics(&self) -> &Arc<TaskMetrics> {
        &self.metrics
    }

    /// Spawn one execution attempt in the background.
    pub fn dispatch(&self) -> JoinHandle<Option<ExecutionRecord>> {
        self.metrics.record_tick();
        let task = self.task.clone();
        let executor = self.executor.clone();
        let metrics = self.metrics.clone();
        tokio::spawn(async move { executor.execute(&task, &metrics).await })
    }

    /// Tick forever. The first tick fires one interval after the call.
    pub async fn run(&self) {
        let period = self.task.interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            task = %self.task.identity(),
            kind = %self.task.kind(),
            interval = %format_duration(period),
            "Task loop started"
        );

        loop {
            ticker.tick().await;
            debug!(task = %self.task.identity(), "Tick");
            // Detached: the outcome goes to the recorder, not back here.
            drop(self.dispatch());
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
