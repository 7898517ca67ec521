//! Wall-clock source for expiry checks.

use std::sync::Arc;

use chrono::Utc;

/// Current time in Unix seconds, with sub-second precision
pub trait Clock {
    fn now_seconds(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_seconds(&self) -> f64 {
        (**self).now_seconds()
    }
}

/// System wall clock (`Date.now()` in the browser)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_seconds(&self) -> f64 {
        Utc::now().timestamp_millis() as f64 / 1000.0
    }
}
