//! Wall-clock access.
//!
//! The orchestrator needs "today" for calendar enablement and a millisecond
//! timestamp for `retrieved_at`. Both come through [`Clock`] so tests can pin
//! them.

use chrono::{NaiveDate, Utc};

/// Source of the current date and time.
pub trait Clock: Send + Sync {
    /// Current calendar date (UTC).
    fn today(&self) -> NaiveDate;

    /// Current instant in epoch milliseconds.
    fn now_millis(&self) -> i64;
}

/// [`Clock`] backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// [`Clock`] that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
    now_millis: i64,
}

impl FixedClock {
    /// A clock pinned to midnight UTC of `today`.
    #[must_use]
    pub fn at(today: NaiveDate) -> Self {
        let now_millis = today
            .and_hms_opt(0, 0, 0)
            .map_or(0, |midnight| midnight.and_utc().timestamp_millis());
        Self { today, now_millis }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_millis(&self) -> i64 {
        self.now_millis
    }
}
