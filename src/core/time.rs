use std::sync::{Arc, Mutex};

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};

/// Clock abstracts access to the current timestamp so services remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current UTC date. Defaults to `now().date_naive()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and what-if simulations.
#[derive(Debug)]
pub struct FixedClock {
    current: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(at),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        let mut guard = self.current.lock().unwrap_or_else(|p| p.into_inner());
        *guard = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.current.lock().unwrap_or_else(|p| p.into_inner());
        *guard += by;
    }

    /// Moves forward by whole calendar months, clamping the day like chrono does.
    pub fn advance_months(&self, months: u32) {
        let mut guard = self.current.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(next) = guard.checked_add_months(Months::new(months)) {
            *guard = next;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Month arithmetic relative to a plan's start date.
///
/// Only the year and month of each timestamp count; the day of month is
/// ignored. A plan started on January 31st is therefore in month 2 from
/// February 1st onwards. This coarse granularity is intentional.
pub struct MonthClock;

impl MonthClock {
    /// Calendar months between `start` and `now`. Negative if `now` precedes `start`.
    pub fn elapsed_months(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        let years = i64::from(now.year()) - i64::from(start.year());
        let months = i64::from(now.month()) - i64::from(start.month());
        years * 12 + months
    }

    /// One-based index of the running month, clamped to `1..=duration_months`.
    pub fn current_month_index(
        start: DateTime<Utc>,
        now: DateTime<Utc>,
        duration_months: u32,
    ) -> u32 {
        let upper = i64::from(duration_months.max(1));
        let index = (Self::elapsed_months(start, now) + 1).clamp(1, upper);
        index as u32
    }
}
