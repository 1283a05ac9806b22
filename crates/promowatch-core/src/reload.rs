use std::time::{Duration, Instant};

/// How long configuration and filters may serve before a refresh is due.
pub const RELOAD_INTERVAL: Duration = Duration::from_secs(30);

/// Time source seam. Production uses `SystemClock`; tests hand the policy
/// fixed instants instead of sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Elapsed-time reload trigger, checked before each inbound event.
///
/// Freshness is coupled to message arrival: a deployment with no traffic
/// keeps serving the old config indefinitely. Accepted trade-off.
#[derive(Debug)]
pub struct ReloadPolicy {
    interval: Duration,
    last: Instant,
}

impl ReloadPolicy {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self { interval, last: now }
    }

    /// True when `interval` has elapsed since the last `mark`.
    pub fn due(&self, now: Instant) -> bool {
        now.duration_since(self.last) >= self.interval
    }

    /// Reset the timer after a reload attempt, successful or not.
    pub fn mark(&mut self, now: Instant) {
        self.last = now;
    }
}
