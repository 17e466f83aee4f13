//! Pacing for metadata-service calls.
//!
//! MusicBrainz allows roughly one request per second per client. Every call
//! goes through a [`RateGate`] which blocks until the next call is allowed.
//! The wait is a plain blocking sleep and is not cancellable.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default gap between consecutive MusicBrainz calls.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1100);

/// Blocks the caller until a call is allowed, then records the call.
pub trait RateGate {
    fn wait_turn(&self);
}

/// Source of time for [`MinIntervalGate`].
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Wall clock with a real thread sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Enforces a minimum interval between consecutive calls.
///
/// The first call passes immediately; the only shared state is the instant of
/// the last call.
pub struct MinIntervalGate<C: Clock = SystemClock> {
    last_call: Mutex<Option<Instant>>,
    min_interval: Duration,
    clock: C,
}

impl MinIntervalGate<SystemClock> {
    pub fn new(min_interval: Duration) -> Self {
        Self::with_clock(min_interval, SystemClock)
    }
}

impl Default for MinIntervalGate<SystemClock> {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl<C: Clock> MinIntervalGate<C> {
    pub fn with_clock(min_interval: Duration, clock: C) -> Self {
        Self {
            last_call: Mutex::new(None),
            min_interval,
            clock,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

impl<C: Clock> RateGate for MinIntervalGate<C> {
    fn wait_turn(&self) {
        let mut last = self.last_call.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(last_time) = *last {
            let elapsed = self.clock.now().saturating_duration_since(last_time);
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                log::debug!("Rate limiting: waiting {:?}", wait_time);
                self.clock.sleep(wait_time);
            }
        }

        *last = Some(self.clock.now());
    }
}

/// Gate that never waits (tests, local mirrors).
#[derive(Debug, Clone, Copy, Default)]
pub struct Unthrottled;

impl RateGate for Unthrottled {
    fn wait_turn(&self) {}
}

impl<G: RateGate + ?Sized> RateGate for &G {
    fn wait_turn(&self) {
        (**self).wait_turn()
    }
}
