//! Trailing-edge debounce built on a cancellable delayed task.

use std::cell::RefCell;
use std::time::Duration;

/// Runs a task once after a delay.
///
/// Dropping the returned handle must cancel the task if it has not fired.
pub trait Scheduler {
    type Handle;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle;
}

/// Each trigger cancels the pending task and restarts the delay, so only the
/// last trigger of a burst runs.
pub struct Debouncer<S: Scheduler> {
    scheduler: S,
    delay: Duration,
    pending: RefCell<Option<S::Handle>>,
}

impl<S: Scheduler> Debouncer<S> {
    pub fn new(scheduler: S, delay: Duration) -> Self {
        Self {
            scheduler,
            delay,
            pending: RefCell::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn trigger(&self, task: impl FnOnce() + 'static) {
        let previous = self.pending.borrow_mut().take();
        drop(previous);
        let handle = self.scheduler.schedule(self.delay, Box::new(task));
        *self.pending.borrow_mut() = Some(handle);
    }

    pub fn cancel(&self) {
        let previous = self.pending.borrow_mut().take();
        drop(previous);
    }
}
