//! Wall-clock source for date-relative queries.
//!
//! Overdue/active/delay calculations compare stored dates against "now".
//! Services read "now" through [`Clock`] so callers and tests can pin it.

use chrono::{Local, NaiveDateTime};

/// Source of the current wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Converts a wall-clock value to the epoch-nanosecond form stored in SQLite.
///
/// Returns `None` outside the representable range (years 1677 to 2262).
pub fn to_epoch_nanos(value: NaiveDateTime) -> Option<i64> {
    value.and_utc().timestamp_nanos_opt()
}

/// Converts a stored epoch-nanosecond value back to wall-clock time.
pub fn from_epoch_nanos(value: i64) -> NaiveDateTime {
    chrono::DateTime::from_timestamp_nanos(value).naive_utc()
}
