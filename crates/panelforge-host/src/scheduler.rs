//! Deferred task execution for listener delivery.
//!
//! The event bus never calls listeners from inside `emit`; it hands each
//! delivery to a [`Scheduler`] so the embedding UI gets to finish its own
//! work first.

use panelforge_runtime::{RuntimeError, RuntimeResult};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::runtime::Handle;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks after a delay. Scheduled tasks cannot be withdrawn.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task);
}

/// Scheduler backed by tokio timers.
///
/// Holds the runtime handle it was built on, so `schedule` may be called
/// from threads outside that runtime and still defers the task.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Bind to the runtime the caller is running on.
    pub fn try_current() -> RuntimeResult<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| RuntimeError::NoAsyncRuntime(e.to_string()))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        self.handle.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            task();
        });
    }
}

/// Scheduler that holds tasks until the embedder runs them.
///
/// Delays are recorded but not waited on; `run_pending` executes tasks in
/// the order they were scheduled.
#[derive(Default)]
pub struct QueuedScheduler {
    tasks: Mutex<VecDeque<(Duration, Task)>>,
}

impl QueuedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting to run.
    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    /// Delays of the waiting tasks, oldest first.
    pub fn pending_delays(&self) -> Vec<Duration> {
        self.tasks.lock().iter().map(|(delay, _)| *delay).collect()
    }

    /// Run every waiting task, including ones scheduled while running.
    /// Returns how many tasks ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            // Pop outside the task call so tasks can schedule more work.
            let next = self.tasks.lock().pop_front();
            match next {
                Some((_, task)) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

impl Scheduler for QueuedScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        self.tasks.lock().push_back((delay, task));
    }
}
