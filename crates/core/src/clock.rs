//! Time abstraction.
//!
//! Staleness, the once-per-day calendar check and control record timestamps
//! all read "now" through [`Clock`] so tests can pin the date.

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::RwLock;

pub trait Clock: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day in UTC.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    fixed_time: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(fixed_time: DateTime<Utc>) -> Self {
        Self {
            fixed_time: RwLock::new(fixed_time),
        }
    }

    /// Move the clock to a new instant.
    pub fn set(&self, time: DateTime<Utc>) {
        if let Ok(mut guard) = self.fixed_time.write() {
            *guard = time;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.fixed_time.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
