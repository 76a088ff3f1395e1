//! # taskloop engine
//!
//! Runs a fixed set of jobs, each on its own interval, forever.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────── Engine ────────────────────────────┐
//! │  TaskLoop(task 1)   TaskLoop(task 2)   ...   TaskLoop(task N)  │
//! │       │ tick             │ tick                   │ tick       │
//! │       ▼                  ▼                        ▼            │
//! │  Executor::execute ── per-task exclusion ── child process      │
//! └───────────────────────────────┬────────────────────────────────┘
//!                                 ▼
//!                          OutcomeRecorder
//! ```
//!
//! - [`Task`]: an immutable job definition that owns its exclusion lock
//! - [`TaskLoop`]: fires a dispatch every interval, never waits on a run
//! - [`Executor`]: acquires the lock, runs the process, classifies the outcome
//! - [`OutcomeRecorder`]: receives exactly one [`ExecutionRecord`] per run
//! - [`Engine`]: validates the task set and keeps the loops alive
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use taskloop_config::{EngineConfig, TaskSpec};
//! use taskloop_engine::{Engine, TracingRecorder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), taskloop_engine::EngineError> {
//!     let specs = vec![TaskSpec::new("echo hello", Duration::from_secs(5))];
//!     let engine = Engine::new(specs, EngineConfig::default(), Arc::new(TracingRecorder))?;
//!     engine.run().await;
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod outcome;
pub mod recorder;
pub mod scheduler;
pub mod task;

pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use executor::Executor;
pub use metrics::{TaskMetrics, TaskMetricsSnapshot};
pub use outcome::{ExecutionRecord, Outcome};
pub use recorder::{MemoryRecorder, OutcomeRecorder, TracingRecorder};
pub use scheduler::TaskLoop;
pub use task::{RunGuard, Task, TaskKind, SCRIPT_SUFFIXES};
