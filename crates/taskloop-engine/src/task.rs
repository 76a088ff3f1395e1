//! Task definitions and per-task exclusion.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};

use taskloop_config::{OverlapPolicy, TaskSpec};

use crate::error::{EngineError, EngineResult};

/// Identity suffixes that mark a task as a shell script.
pub const SCRIPT_SUFFIXES: &[&str] = &[".sh"];

/// How a task's identity is turned into a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Run through the configured shell with the path as the only argument.
    ShellScript,
    /// Split into a program and its arguments.
    Command,
}

impl TaskKind {
    /// Classify an identity by its suffix.
    pub fn classify(identity: &str) -> Self {
        if SCRIPT_SUFFIXES
            .iter()
            .any(|suffix| identity.ends_with(suffix))
        {
            TaskKind::ShellScript
        } else {
            TaskKind::Command
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::ShellScript => write!(f, "script"),
            TaskKind::Command => write!(f, "command"),
        }
    }
}

/// A scheduled job.
///
/// Everything but the exclusion state is fixed at construction. Each task
/// owns its own lock; two tasks with the same identity still run
/// independently of each other.
#[derive(Debug)]
pub struct Task {
    identity: String,
    kind: TaskKind,
    interval: Duration,
    exclusion: Mutex<()>,
    /// Set while a [`RunGuard`] holds `exclusion`.
    running: AtomicBool,
    /// Attempts currently queued on `exclusion` under the skip policy.
    pending: AtomicUsize,
}

impl Task {
    /// Create a task, rejecting blank identities and zero intervals.
    pub fn new(identity: impl Into<String>, interval: Duration) -> EngineResult<Self> {
        let identity = identity.into().trim().to_string();
        if identity.is_empty() {
            return Err(EngineError::EmptyIdentity);
        }
        if interval.is_zero() {
            return Err(EngineError::NonPositiveInterval {
                task: identity,
                interval,
            });
        }

        Ok(Self {
            kind: TaskKind::classify(&identity),
            identity,
            interval,
            exclusion: Mutex::new(()),
            running: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
        })
    }

    pub fn from_spec(spec: &TaskSpec) -> EngineResult<Self> {
        Self::new(spec.identity.clone(), spec.interval)
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether an execution currently holds the exclusion lock.
    ///
    /// Reads a flag maintained by [`RunGuard`] and never touches the lock
    /// itself, so it cannot make a concurrent [`acquire`](Self::acquire)
    /// drop its attempt.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Number of attempts waiting behind a running execution (skip policy only).
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Acquire the exclusion lock according to `policy`.
    ///
    /// Under [`OverlapPolicy::Block`] this always waits. Under
    /// [`OverlapPolicy::Skip`] it waits only if fewer than `max_pending`
    /// attempts are already queued, and returns `None` otherwise.
    pub async fn acquire(
        &self,
        policy: OverlapPolicy,
        max_pending: usize,
    ) -> Option<RunGuard<'_>> {
        let guard = match policy {
            OverlapPolicy::Block => self.exclusion.lock().await,
            OverlapPolicy::Skip => match self.exclusion.try_lock() {
                Ok(guard) => guard,
                Err(_) => {
                    let _slot = PendingSlot::reserve(&self.pending, max_pending)?;
                    self.exclusion.lock().await
                }
            },
        };
        Some(RunGuard::new(guard, &self.running))
    }
}

/// Exclusive right to run a task, released on drop.
#[derive(Debug)]
pub struct RunGuard<'a> {
    _guard: MutexGuard<'a, ()>,
    running: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn new(guard: MutexGuard<'a, ()>, running: &'a AtomicBool) -> Self {
        running.store(true, Ordering::SeqCst);
        Self {
            _guard: guard,
            running,
        }
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        // Cleared before the lock is released, so the next holder sets it again.
        self.running.store(false, Ordering::SeqCst);
    }
}

/// A reserved place in a task's wait queue, released on drop.
struct PendingSlot<'a> {
    pending: &'a AtomicUsize,
}

impl<'a> PendingSlot<'a> {
    fn reserve(pending: &'a AtomicUsize, max_pending: usize) -> Option<Self> {
        pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < max_pending).then_some(n + 1)
            })
            .ok()
            .map(|_| Self { pending })
    }
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
