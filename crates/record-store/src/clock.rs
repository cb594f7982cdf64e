//! Calendar source for relative-date matching and date defaults.

use chrono::{NaiveDate, Utc};

pub trait Clock: Send + Sync + std::fmt::Debug {
    /// The current calendar date (UTC).
    fn today(&self) -> NaiveDate;
}

/// Wall-clock calendar.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock frozen on one date.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
