//! Calendar decomposition of the wall clock

use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Broken-down UTC time carried by every record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    /// Full year, e.g. 2024
    pub year: i32,
    /// Month, 1-12
    pub month: u32,
    /// Day of month, 1-31
    pub day: u32,
    /// Hour, 0-23
    pub hour: u32,
    /// Minute, 0-59
    pub minute: u32,
    /// Second, 0-60
    pub second: u32,
    /// Zero-based day of the year, 0-365
    pub day_of_year: u32,
}

impl Timestamp {
    /// Decompose a UTC instant
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
            day_of_year: dt.ordinal0(),
        }
    }
}

/// `<year>-<month>-<day> <hour>:<minute>:<second>`, unpadded
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{} {}:{}:{}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Source of record timestamps
pub trait Clock: Send + Sync + 'static {
    /// Current time, or `None` when it cannot be decomposed
    fn now(&self) -> Option<Timestamp>;
}

/// Wall clock in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Option<Timestamp> {
        Some(Timestamp::from_datetime(Utc::now()))
    }
}

/// Clock that only moves when told to
///
/// Clones share the same instant, so a handle kept by the caller steers the
/// clock installed in a logger.
#[derive(Debug, Clone)]
pub struct ManualClock {
    instant: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl ManualClock {
    /// Create a clock fixed at `instant`
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(Mutex::new(Some(instant))),
        }
    }

    /// Move the clock to `instant`
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.lock() = Some(instant);
    }

    /// Move the clock forward by whole days
    pub fn advance_days(&self, days: i64) {
        let mut instant = self.instant.lock();
        if let Some(current) = instant.as_mut() {
            *current += TimeDelta::days(days);
        }
    }

    /// Make every subsequent `now()` fail until `set` is called
    pub fn unset(&self) {
        *self.instant.lock() = None;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Option<Timestamp> {
        self.instant.lock().map(Timestamp::from_datetime)
    }
}
