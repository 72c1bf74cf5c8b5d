//! Clocks and stopwatch timers
//!
//! Every timing rule in the game (frame delay, fade, lifespans, spawn cadence)
//! is an elapsed-ms threshold on a `Timer`. Timers read a `Clock` passed in by
//! their owner; the simulation uses `SimClock`, advanced once per fixed tick,
//! which keeps runs reproducible.

use std::time::Instant;

/// Source of monotonic milliseconds
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Deterministic clock advanced explicitly by the game loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimClock {
    now: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.now
    }
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Stopwatch measuring milliseconds since its last mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    marked_at: u64,
}

impl Timer {
    /// A timer marked at the clock's current instant
    pub fn started(clock: &impl Clock) -> Self {
        Self {
            marked_at: clock.now_ms(),
        }
    }

    /// Reset the reference instant to now
    pub fn mark(&mut self, clock: &impl Clock) {
        self.marked_at = clock.now_ms();
    }

    /// Milliseconds since the last mark (never negative)
    pub fn elapsed_ms(&self, clock: &impl Clock) -> u64 {
        clock.now_ms().saturating_sub(self.marked_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_and_mark() {
        let mut clock = SimClock::new();
        let mut timer = Timer::started(&clock);
        assert_eq!(timer.elapsed_ms(&clock), 0);

        clock.advance(250);
        assert_eq!(timer.elapsed_ms(&clock), 250);

        timer.mark(&clock);
        assert_eq!(timer.elapsed_ms(&clock), 0);
        clock.advance(16);
        assert_eq!(timer.elapsed_ms(&clock), 16);
    }

    #[test]
    fn test_elapsed_never_negative() {
        let mut later = SimClock::new();
        later.advance(1000);
        let timer = Timer::started(&later);
        // A clock behind the mark reads as zero, not underflow
        let earlier = SimClock::new();
        assert_eq!(timer.elapsed_ms(&earlier), 0);
    }

    #[test]
    fn test_monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
