//! Lossy rate limiter for high-frequency native callbacks.
//!
//! Unlike a debouncer, a call that arrives too early is dropped outright and
//! never replayed, so the last resize of a fast drag can be lost until the
//! next one arrives.

use std::time::{Duration, Instant};

/// Minimum spacing between resize notifications emitted by a window.
pub const RESIZE_THROTTLE: Duration = Duration::from_millis(15);

#[derive(Debug, Clone)]
pub struct Throttle {
    period: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(period: Duration) -> Self {
        Self { period, last: None }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run `f` unless the last accepted call was less than `period` ago.
    /// The first call always runs. Returns whether `f` ran.
    pub fn trigger<F: FnOnce()>(&mut self, f: F) -> bool {
        self.trigger_at(Instant::now(), f)
    }

    pub fn trigger_at<F: FnOnce()>(&mut self, now: Instant, f: F) -> bool {
        let due = self.ready_at(now);
        if due {
            f();
        }
        due
    }

    /// Gate form of [`Throttle::trigger`]: returns true, and records the call
    /// as accepted, when a call made now would run.
    pub fn ready(&mut self) -> bool {
        self.ready_at(Instant::now())
    }

    pub fn ready_at(&mut self, now: Instant) -> bool {
        let due = match self.last {
            Some(last) => now.saturating_duration_since(last) >= self.period,
            None => true,
        };
        if due {
            self.last = Some(now);
        }
        due
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(RESIZE_THROTTLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn drops_calls_inside_period() {
        let start = Instant::now();
        let mut throttle = Throttle::new(ms(15));
        let mut fired = 0;

        assert!(throttle.trigger_at(start, || fired += 1));
        assert!(!throttle.trigger_at(start + ms(10), || fired += 1));
        assert!(throttle.trigger_at(start + ms(20), || fired += 1));

        assert_eq!(fired, 2);
    }

    #[test]
    fn gap_is_measured_from_last_accepted_call() {
        let start = Instant::now();
        let mut throttle = Throttle::new(ms(15));
        let mut fired = 0;

        throttle.trigger_at(start, || fired += 1);
        // Dropped calls do not push the window forward.
        throttle.trigger_at(start + ms(10), || fired += 1);
        throttle.trigger_at(start + ms(14), || fired += 1);
        throttle.trigger_at(start + ms(15), || fired += 1);

        assert_eq!(fired, 2);
    }

    #[test]
    fn zero_period_accepts_every_call() {
        let start = Instant::now();
        let mut throttle = Throttle::new(Duration::ZERO);
        assert!(throttle.trigger_at(start, || {}));
        assert!(throttle.trigger_at(start, || {}));
    }

    #[test]
    fn clock_going_backwards_is_dropped() {
        let start = Instant::now() + ms(100);
        let mut throttle = Throttle::new(ms(15));
        assert!(throttle.trigger_at(start, || {}));
        assert!(!throttle.trigger_at(start - ms(50), || {}));
    }

    #[test]
    fn wall_clock_trigger() {
        let mut throttle = Throttle::new(Duration::from_secs(60));
        assert!(throttle.trigger(|| {}));
        assert!(!throttle.trigger(|| {}));
    }

    #[test]
    fn ready_gate_matches_trigger() {
        let start = Instant::now();
        let mut throttle = Throttle::new(ms(15));
        assert!(throttle.ready_at(start));
        assert!(!throttle.ready_at(start + ms(10)));
        assert!(throttle.ready_at(start + ms(20)));
    }

    #[test]
    fn default_uses_resize_period() {
        assert_eq!(Throttle::default().period(), RESIZE_THROTTLE);
    }
}
