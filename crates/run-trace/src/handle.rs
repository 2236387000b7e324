//! Shared handle over the mutable run trace.

use std::sync::Arc;

use parking_lot::Mutex;

use keyward_core_types::Element;

use crate::{Runner, TestStep};

/// Cloneable handle over the one mutable [`Runner`] of a suite run.
///
/// Keyword calls, hook wrappers, and the run loop all mutate the trace
/// through the same handle; the run loop is single-threaded, so the lock is
/// only ever briefly contended by listeners.
#[derive(Debug, Clone)]
pub struct RunnerHandle {
    inner: Arc<Mutex<Runner>>,
}

impl RunnerHandle {
    pub fn new(runner: Runner) -> Self {
        RunnerHandle {
            inner: Arc::new(Mutex::new(runner)),
        }
    }

    /// Runs `f` with exclusive access to the runner. Keep the closure free of
    /// `.await` points; the lock is not an async lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut Runner) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Clones the current state of the whole trace tree.
    pub fn snapshot(&self) -> Runner {
        self.inner.lock().clone()
    }

    pub fn current_test_case_index(&self) -> usize {
        self.inner.lock().current_test_case_index()
    }

    pub fn set_current_test_case_index(&self, index: usize) {
        self.inner.lock().set_current_test_case_index(index);
    }

    /// Appends a finished step record to the currently executing case.
    pub fn push_step(&self, step: TestStep) {
        self.inner.lock().push_step(step);
    }

    /// Appends to the self-healing audit log.
    pub fn record_self_healing(&self, element: &Element) {
        self.inner.lock().record_self_healing(element);
    }
}
