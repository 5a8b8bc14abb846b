//! Clock management module
//!
//! This module provides the [`TimestampSource`] capability consulted by sets
//! when an operation does not carry an explicit timestamp, plus the
//! [`CompactTimestamp`] type produced by the built-in sources.
//!
//! Sets only compare timestamps; they never inspect absolute values. Any source
//! whose timestamps are totally ordered can be plugged in.

use core::fmt::Debug;
use core::sync::atomic::{AtomicU64, Ordering};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Compact timestamp used by the built-in sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CompactTimestamp {
    /// Timestamp value
    pub value: u64,
}

impl CompactTimestamp {
    /// Creates a new timestamp
    pub const fn new(value: u64) -> Self {
        Self { value }
    }

    /// Creates a zero timestamp
    pub const fn zero() -> Self {
        Self { value: 0 }
    }

    /// Returns the timestamp value
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Returns the timestamp as u64
    pub const fn as_u64(&self) -> u64 {
        self.value
    }
}

impl From<u64> for CompactTimestamp {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

/// Produces timestamps used to order set operations.
///
/// The set trusts whatever it is given: no monotonicity is enforced. Only the
/// relative order of timestamps matters when records are merged.
///
/// `now` takes `&self` so that one source can be shared between several
/// replicas; stateful sources advance through interior mutability.
pub trait TimestampSource {
    /// Totally ordered timestamp type
    type Timestamp: Ord + Copy + Debug;

    /// Returns the timestamp for the next operation
    fn now(&self) -> Self::Timestamp;
}

impl<S: TimestampSource + ?Sized> TimestampSource for &S {
    type Timestamp = S::Timestamp;

    fn now(&self) -> Self::Timestamp {
        (**self).now()
    }
}

impl<S: TimestampSource + ?Sized> TimestampSource for Rc<S> {
    type Timestamp = S::Timestamp;

    fn now(&self) -> Self::Timestamp {
        (**self).now()
    }
}

impl<S: TimestampSource + ?Sized> TimestampSource for Arc<S> {
    type Timestamp = S::Timestamp;

    fn now(&self) -> Self::Timestamp {
        (**self).now()
    }
}

/// Strictly increasing logical counter
///
/// Every call to [`now`](TimestampSource::now) returns the previous value plus
/// one, starting at 1 for a fresh clock. Useful for deterministic tests and for
/// deployments that prefer logical time over wall-clock time.
///
/// The counter saturates at `u64::MAX`; from there every call returns the same
/// value instead of wrapping back below earlier timestamps.
///
/// Cloning copies the current counter value; the clone advances independently.
/// Wrap the clock in an [`Arc`] or [`Rc`] to share it between replicas.
///
/// # Example
/// ```rust
/// use lwwset::prelude::*;
///
/// let clock = LogicalClock::new();
/// assert_eq!(clock.now(), CompactTimestamp::new(1));
/// assert_eq!(clock.now(), CompactTimestamp::new(2));
/// assert_eq!(clock.current(), CompactTimestamp::new(2));
/// ```
#[derive(Debug, Default)]
pub struct LogicalClock {
    counter: AtomicU64,
}

impl LogicalClock {
    /// Creates a clock whose first timestamp is 1
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a clock whose first timestamp is `value + 1`
    pub const fn starting_at(value: u64) -> Self {
        Self {
            counter: AtomicU64::new(value),
        }
    }

    /// Returns the last issued timestamp without advancing
    pub fn current(&self) -> CompactTimestamp {
        CompactTimestamp::new(self.counter.load(Ordering::Relaxed))
    }
}

impl Clone for LogicalClock {
    fn clone(&self) -> Self {
        Self::starting_at(self.counter.load(Ordering::Relaxed))
    }
}

impl TimestampSource for LogicalClock {
    type Timestamp = CompactTimestamp;

    fn now(&self) -> CompactTimestamp {
        let previous = match self
            .counter
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| Some(n.saturating_add(1)))
        {
            Ok(previous) | Err(previous) => previous,
        };
        CompactTimestamp::new(previous.saturating_add(1))
    }
}

/// Wall-clock source in microseconds since the Unix epoch
///
/// Timestamps issued by one instance are strictly increasing: when the wall
/// clock has not moved past the last issued value (same microsecond, or the
/// clock stepped backwards) the next value is the last one plus one.
///
/// Replicas with skewed clocks may still resurrect or lose elements on merge.
/// Prefer [`LogicalClock`] or an externally coordinated source when that
/// matters.
///
/// Cloning copies the last issued value; the clone advances independently.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicU64,
}

impl SystemClock {
    /// Creates a wall-clock source
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    fn wall_micros() -> u64 {
        // A clock set before the epoch reads as zero
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

impl Clone for SystemClock {
    fn clone(&self) -> Self {
        Self {
            last: AtomicU64::new(self.last.load(Ordering::Relaxed)),
        }
    }
}

impl TimestampSource for SystemClock {
    type Timestamp = CompactTimestamp;

    fn now(&self) -> CompactTimestamp {
        let wall = Self::wall_micros();
        let next = |last: u64| wall.max(last.saturating_add(1));
        let last = match self
            .last
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| Some(next(last)))
        {
            Ok(last) | Err(last) => last,
        };
        CompactTimestamp::new(next(last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_clock_increments() {
        let clock = LogicalClock::new();
        assert_eq!(clock.current(), CompactTimestamp::zero());
        assert_eq!(clock.now().value(), 1);
        assert_eq!(clock.now().value(), 2);
        assert_eq!(clock.current().as_u64(), 2);
    }

    #[test]
    fn test_logical_clock_starting_at() {
        let clock = LogicalClock::starting_at(41);
        assert_eq!(clock.now(), CompactTimestamp::new(42));
    }

    #[test]
    fn test_logical_clock_clone_is_independent() {
        let clock = LogicalClock::new();
        clock.now();
        let copy = clock.clone();

        assert_eq!(copy.now().value(), 2);
        assert_eq!(copy.now().value(), 3);
        assert_eq!(clock.now().value(), 2);
    }

    #[test]
    fn test_shared_sources_advance_together() {
        let clock = Arc::new(LogicalClock::new());
        let other = Arc::clone(&clock);
        assert_eq!(clock.now().value(), 1);
        assert_eq!(other.now().value(), 2);

        let local = Rc::new(LogicalClock::new());
        let borrowed = &*local;
        assert_eq!(local.now().value(), 1);
        assert_eq!(borrowed.now().value(), 2);
    }

    #[test]
    fn test_logical_clock_saturates() {
        let clock = LogicalClock::starting_at(u64::MAX - 1);
        assert_eq!(clock.now().value(), u64::MAX);
        assert_eq!(clock.now().value(), u64::MAX);
        assert_eq!(clock.current().value(), u64::MAX);
    }

    #[test]
    fn test_system_clock_is_after_epoch() {
        let clock = SystemClock::new();
        assert!(clock.now() > CompactTimestamp::zero());
    }

    #[test]
    fn test_system_clock_strictly_increases() {
        let clock = SystemClock::new();
        let mut previous = clock.now();
        for _ in 0..10_000 {
            let next = clock.now();
            assert!(next > previous, "{next:?} not after {previous:?}");
            previous = next;
        }
    }

    #[test]
    fn test_system_clock_runs_ahead_of_wall_time() {
        // Last issued value far in the future: the clock keeps counting from it
        let clock = SystemClock {
            last: AtomicU64::new(u64::MAX - 2),
        };
        assert_eq!(clock.now().value(), u64::MAX - 1);

        let copy = clock.clone();
        assert_eq!(copy.now().value(), u64::MAX);
        assert_eq!(clock.now().value(), u64::MAX);
    }

    #[test]
    fn test_timestamp_ordering() {
        assert!(CompactTimestamp::new(1) < CompactTimestamp::new(2));
        assert_eq!(CompactTimestamp::from(7u64), CompactTimestamp::new(7));
        assert_eq!(CompactTimestamp::default(), CompactTimestamp::zero());
    }
}
