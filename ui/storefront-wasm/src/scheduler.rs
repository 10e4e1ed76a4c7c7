//! Browser timers for the search debouncer.

use gloo_timers::callback::Timeout;
use ms_storefront_core::Scheduler;
use std::time::Duration;

/// `setTimeout` scheduler; dropping the `Timeout` clears it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Timeout {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task)
    }
}
