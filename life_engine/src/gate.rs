// gate.rs - Rate limiting of generation advances

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Source of the current time. Injected so gating can be tested without sleeping.
pub trait Clock: Send {
    fn now(&self) -> Instant;
}

/// The monotonic system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(origin: Instant) -> Self {
        Self {
            origin,
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += by;
    }

    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

impl<C: Clock + Sync> Clock for std::sync::Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Waiting for the interval to pass.
    Idle,
    /// A generation is being computed.
    Advancing,
}

/// Lets a generation advance through at most once per interval.
///
/// The interval is measured from the end of the previous advance, and the
/// check never blocks: a tick that comes too early is simply a no-op.
#[derive(Debug, Clone)]
pub struct UpdateGate {
    interval: Duration,
    last_advance: Instant,
    state: GateState,
}

impl UpdateGate {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_advance: now,
            state: GateState::Idle,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn last_advance(&self) -> Instant {
        self.last_advance
    }

    /// Whether an advance is due at `now`. Time running backwards counts as no time.
    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_advance) >= self.interval
    }

    /// Moves Idle to Advancing when an advance is due. Returns whether it did.
    pub fn try_begin(&mut self, now: Instant) -> bool {
        if self.state == GateState::Idle && self.is_due(now) {
            self.state = GateState::Advancing;
            true
        } else {
            false
        }
    }

    /// Ends an advance, restarting the interval from `now`.
    pub fn complete(&mut self, now: Instant) {
        self.last_advance = now;
        self.state = GateState::Idle;
    }

    /// Restarts the interval without an advance, e.g. after a pause.
    pub fn reset(&mut self, now: Instant) {
        self.complete(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(16);

    #[test]
    fn test_not_due_before_interval() {
        let clock = ManualClock::new();
        let mut gate = UpdateGate::new(INTERVAL, clock.now());
        clock.advance(Duration::from_millis(15));
        assert!(!gate.try_begin(clock.now()));
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn test_due_at_interval() {
        let clock = ManualClock::new();
        let mut gate = UpdateGate::new(INTERVAL, clock.now());
        clock.advance(INTERVAL);
        assert!(gate.try_begin(clock.now()));
        assert_eq!(gate.state(), GateState::Advancing);
        // No second advance while one is in flight
        assert!(!gate.try_begin(clock.now()));
    }

    #[test]
    fn test_complete_restarts_interval() {
        let clock = ManualClock::new();
        let mut gate = UpdateGate::new(INTERVAL, clock.now());
        clock.advance(Duration::from_millis(20));
        assert!(gate.try_begin(clock.now()));
        clock.advance(Duration::from_millis(5));
        gate.complete(clock.now());
        assert_eq!(gate.state(), GateState::Idle);

        clock.advance(Duration::from_millis(12));
        assert!(!gate.is_due(clock.now()));
        clock.advance(Duration::from_millis(4));
        assert!(gate.is_due(clock.now()));
    }

    #[test]
    fn test_backwards_time_is_not_due() {
        let start = Instant::now();
        let gate = UpdateGate::new(INTERVAL, start + Duration::from_secs(1));
        assert!(!gate.is_due(start));
    }

    #[test]
    fn test_manual_clock() {
        let origin = Instant::now();
        let clock = ManualClock::starting_at(origin);
        assert_eq!(clock.now(), origin);
        clock.advance(Duration::from_secs(2));
        assert_eq!(clock.now(), origin + Duration::from_secs(2));
        assert_eq!(clock.elapsed(), Duration::from_secs(2));
    }
}
