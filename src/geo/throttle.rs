use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::{sleep_until, Instant};

/// Keeps at least `interval` between the end of one remote call and the
/// start of the next. A zero interval never waits.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the next slot and claim it. Hold the returned [`Slot`] for
    /// the duration of the call; the gap is measured from when it drops.
    pub async fn wait(&self) -> Slot<'_> {
        if self.interval.is_zero() {
            return Slot { last: None };
        }
        let last = self.last.lock().await;
        if let Some(prev) = *last {
            sleep_until(prev + self.interval).await;
        }
        Slot { last: Some(last) }
    }
}

/// Exclusive right to make one remote call
#[must_use = "the call must run while the slot is held"]
pub struct Slot<'a> {
    last: Option<MutexGuard<'a, Option<Instant>>>,
}

impl Drop for Slot<'_> {
    fn drop(&mut self) {
        if let Some(last) = self.last.as_mut() {
            **last = Some(Instant::now());
        }
    }
}
