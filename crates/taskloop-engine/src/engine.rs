//! The engine supervisor: owns the task set and its loops.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use taskloop_config::{format_duration, EngineConfig, TaskSpec};

use crate::error::{EngineError, EngineResult};
use crate::executor::Executor;
use crate::metrics::TaskMetricsSnapshot;
use crate::recorder::OutcomeRecorder;
use crate::scheduler::TaskLoop;
use crate::task::Task;

/// Owns a fixed, validated set of tasks and one loop per task.
///
/// The set cannot change after construction. There is no shutdown: the
/// engine runs until the process exits.
pub struct Engine {
    config: EngineConfig,
    loops: Vec<Arc<TaskLoop>>,
}

impl Engine {
    /// Validate every spec and build the loops.
    ///
    /// Fails without starting anything if the set is empty, an interval is
    /// zero, an identity is blank, or the engine config is invalid.
    pub fn new(
        specs: impl IntoIterator<Item = TaskSpec>,
        config: EngineConfig,
        recorder: Arc<dyn OutcomeRecorder>,
    ) -> EngineResult<Self> {
        config.validate()?;

        let tasks = specs
            .into_iter()
            .map(|spec| Task::from_spec(&spec).map(Arc::new))
            .collect::<EngineResult<Vec<_>>>()?;

        if tasks.is_empty() {
            return Err(EngineError::EmptyTaskSet);
        }

        let mut seen = HashSet::new();
        for task in &tasks {
            if !seen.insert(task.identity()) {
                warn!(
                    task = %task.identity(),
                    "Task is defined more than once; each copy runs on its own schedule"
                );
            }
        }

        let executor = Arc::new(Executor::new(&config, recorder));
        let loops = tasks
            .into_iter()
            .map(|task| Arc::new(TaskLoop::new(task, executor.clone())))
            .collect();

        Ok(Self { config, loops })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn task_count(&self) -> usize {
        self.loops.len()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.loops.iter().map(|l| l.task().as_ref())
    }

    pub fn loops(&self) -> &[Arc<TaskLoop>] {
        &self.loops
    }

    /// Current counters for every task, in definition order.
    pub fn metrics(&self) -> Vec<TaskMetricsSnapshot> {
        self.loops.iter().map(|l| l.metrics().snapshot()).collect()
    }

    /// Start every loop in the background and return their handles.
    pub fn spawn(&self) -> Vec<JoinHandle<()>> {
        self.log_start();
        self.loops.iter().map(spawn_loop).collect()
    }

    /// Run all loops; never returns.
    ///
    /// The first loop runs on the caller, which keeps the process alive;
    /// the rest are spawned onto the runtime.
    pub async fn run(&self) {
        let Some((main, rest)) = self.loops.split_first() else {
            return;
        };

        self.log_start();
        for task_loop in rest {
            // Detached for the life of the process.
            drop(spawn_loop(task_loop));
        }
        main.run().await;
    }

    fn log_start(&self) {
        info!(
            tasks = self.loops.len(),
            overlap = %self.config.overlap,
            max_pending = self.config.max_pending,
            "Starting engine"
        );
        for task in self.tasks() {
            info!(
                task = %task.identity(),
                kind = %task.kind(),
                interval = %format_duration(task.interval()),
                "Scheduled"
            );
        }
    }
}

fn spawn_loop(task_loop: &Arc<TaskLoop>) -> JoinHandle<()> {
    let task_loop = task_loop.clone();
    tokio::spawn(async move { task_loop.run().await })
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
