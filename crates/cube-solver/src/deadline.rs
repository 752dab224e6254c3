//! Wall-clock deadlines shared by every strategy.
//!
//! Reading the clock on every expansion is measurable overhead, so strategies
//! go through a [`DeadlineCheck`] that only consults the clock once every
//! [`CHECK_INTERVAL`] ticks. Strategies also call [`Deadline::expired`]
//! directly at coarse boundaries (a bidirectional layer, a deepening bound).

use std::time::{Duration, Instant};

/// Node expansions between two clock reads.
pub const CHECK_INTERVAL: u64 = 1000;

/// An optional instant after which a search gives up with `TimedOut`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline that never expires.
    pub fn none() -> Self {
        Self { at: None }
    }

    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(timeout),
        }
    }

    pub fn from_timeout(timeout: Option<Duration>) -> Self {
        timeout.map_or_else(Self::none, Self::after)
    }

    pub fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Amortised deadline polling.
#[derive(Debug, Clone)]
pub struct DeadlineCheck {
    deadline: Deadline,
    ticks: u64,
}

impl DeadlineCheck {
    pub fn new(deadline: Deadline) -> Self {
        Self { deadline, ticks: 0 }
    }

    /// Counts one unit of work; true once the deadline has passed.
    #[inline]
    pub fn tick(&mut self) -> bool {
        self.ticks += 1;
        self.ticks % CHECK_INTERVAL == 0 && self.deadline.expired()
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_never_expires() {
        assert!(!Deadline::none().expired());
        assert!(!Deadline::from_timeout(None).expired());
    }

    #[test]
    fn test_zero_timeout_is_expired() {
        assert!(Deadline::after(Duration::ZERO).expired());
    }

    #[test]
    fn test_check_only_reads_clock_on_interval() {
        let mut check = DeadlineCheck::new(Deadline::after(Duration::ZERO));
        for _ in 1..CHECK_INTERVAL {
            assert!(!check.tick());
        }
        assert!(check.tick());
    }
}
