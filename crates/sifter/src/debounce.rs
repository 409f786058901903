//! Trailing-edge debouncing.
//!
//! A [`Debouncer`] holds at most one pending value and the instant it becomes
//! due. Scheduling a new value replaces the old one and restarts the quiet
//! period, so only the last value of a burst is ever released. It is
//! pull-based: the owner calls [`Debouncer::poll`] from its event loop (a
//! frame tick, an idle callback) and acts on whatever comes out.
//!
//! Time comes from a [`Clock`], so tests can drive it with a [`ManualClock`].
//!
//! ```
//! use std::time::Duration;
//! use sifter::{Debouncer, ManualClock};
//!
//! let clock = ManualClock::new();
//! let mut debouncer = Debouncer::with_clock(Duration::from_millis(300), clock.clone());
//!
//! debouncer.schedule("a");
//! clock.advance(Duration::from_millis(100));
//! debouncer.schedule("ab");
//! clock.advance(Duration::from_millis(299));
//! assert_eq!(debouncer.poll(), None);
//! clock.advance(Duration::from_millis(1));
//! assert_eq!(debouncer.poll(), Some("ab"));
//! assert_eq!(debouncer.poll(), None);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the code under test.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed_nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            origin: Instant::now(),
            elapsed_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Moves time forward.
    pub fn advance(&self, by: Duration) {
        self.elapsed_nanos
            .fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::SeqCst))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        ManualClock::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    due: Instant,
}

/// Holds the latest scheduled value until its quiet period has passed.
///
/// Dropping the debouncer discards any pending value.
#[derive(Debug)]
pub struct Debouncer<T, C: Clock = SystemClock> {
    delay: Duration,
    clock: C,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T, SystemClock> {
    /// Creates a debouncer on wall-clock time.
    pub fn new(delay: Duration) -> Self {
        Debouncer::with_clock(delay, SystemClock)
    }
}

impl<T, C: Clock> Debouncer<T, C> {
    /// Creates a debouncer on the given clock.
    pub fn with_clock(delay: Duration, clock: C) -> Self {
        Debouncer {
            delay,
            clock,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Changes the quiet period. A value already pending keeps its deadline.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Schedules `value`, replacing any pending one and restarting the timer.
    pub fn schedule(&mut self, value: T) {
        let due = self.clock.now() + self.delay;
        self.pending = Some(Pending { value, due });
    }

    /// Releases the pending value if its deadline has passed.
    pub fn poll(&mut self) -> Option<T> {
        let due = self.pending.as_ref()?.due;
        if self.clock.now() < due {
            return None;
        }
        self.pending.take().map(|p| p.value)
    }

    /// Releases the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Discards the pending value. Returns `true` if there was one.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Time left until the pending value becomes due.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline()
            .map(|due| due.saturating_duration_since(self.clock.now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn only_last_value_of_a_burst_fires() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::with_clock(DELAY, clock.clone());

        debouncer.schedule("a");
        clock.advance(ms(100));
        debouncer.schedule("ab");
        clock.advance(ms(50));
        debouncer.schedule("abc");

        // t = 449ms
        clock.advance(ms(299));
        assert_eq!(debouncer.poll(), None);

        // t = 450ms
        clock.advance(ms(1));
        assert_eq!(debouncer.poll(), Some("abc"));
        assert_eq!(debouncer.poll(), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn deadline_and_remaining() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::with_clock(DELAY, clock.clone());
        assert_eq!(debouncer.deadline(), None);

        debouncer.schedule(1);
        assert_eq!(debouncer.remaining(), Some(DELAY));
        clock.advance(ms(120));
        assert_eq!(debouncer.remaining(), Some(ms(180)));
        clock.advance(ms(500));
        assert_eq!(debouncer.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn cancel_discards() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::with_clock(DELAY, clock.clone());
        debouncer.schedule("x");
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());
        clock.advance(ms(1000));
        assert_eq!(debouncer.poll(), None);
    }

    #[test]
    fn flush_releases_early() {
        let mut debouncer = Debouncer::with_clock(DELAY, ManualClock::new());
        debouncer.schedule("now");
        assert_eq!(debouncer.flush(), Some("now"));
        assert_eq!(debouncer.flush(), None);
    }

    #[test]
    fn zero_delay_fires_on_next_poll() {
        let mut debouncer = Debouncer::with_clock(Duration::ZERO, ManualClock::new());
        debouncer.schedule(7);
        assert_eq!(debouncer.poll(), Some(7));
    }

    #[test]
    fn system_clock_debouncer_holds_value() {
        let mut debouncer = Debouncer::new(Duration::from_secs(60));
        debouncer.schedule("later");
        assert_eq!(debouncer.poll(), None);
        assert!(debouncer.is_pending());
    }
}
