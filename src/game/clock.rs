//! # Clock
//!
//! Game time is a `Duration` since the start of the game and is always
//! passed in by the caller. The engine never reads the system clock itself.

use std::time::{Duration, Instant};

/// Source of game timestamps.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Real time measured from when the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }
}

/// A clock advanced by hand, for tests and headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, by: Duration) -> Duration {
        self.now += by;
        self.now
    }

    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }
}

/// Deadline tracking for the active turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTimer {
    duration: Duration,
    deadline: Duration,
}

impl TurnTimer {
    /// Creates a timer whose first deadline is `duration` after `now`.
    pub fn new(duration: Duration, now: Duration) -> Self {
        Self {
            duration,
            deadline: now + duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn restart(&mut self, now: Duration) {
        self.deadline = now + self.duration;
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self, now: Duration) -> Duration {
        self.deadline.saturating_sub(now)
    }

    pub fn is_expired(&self, now: Duration) -> bool {
        now >= self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let mut clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance(Duration::from_secs(3));
        assert_eq!(clock.advance(Duration::from_secs(2)), Duration::from_secs(5));
        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(1));
    }

    #[test]
    fn test_timer_expiry_and_restart() {
        let mut timer = TurnTimer::new(Duration::from_secs(35), Duration::ZERO);
        assert_eq!(timer.remaining(Duration::from_secs(10)), Duration::from_secs(25));
        assert!(!timer.is_expired(Duration::from_secs(34)));
        assert!(timer.is_expired(Duration::from_secs(35)));
        assert_eq!(timer.remaining(Duration::from_secs(50)), Duration::ZERO);

        timer.restart(Duration::from_secs(50));
        assert_eq!(timer.deadline(), Duration::from_secs(85));
        assert!(!timer.is_expired(Duration::from_secs(50)));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
