//! Pay periods: the 25th of one month through the 24th of the next.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Day of month on which every pay period starts.
pub const PERIOD_START_DAY: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PayPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PayPeriod {
    /// The period that contains `day`.
    pub fn containing(day: NaiveDate) -> Self {
        let start = if day.day() >= PERIOD_START_DAY {
            day - Days::new((day.day() - PERIOD_START_DAY) as u64)
        } else {
            let last_of_prev = day - Days::new(day.day() as u64);
            last_of_prev - Days::new((last_of_prev.day() - PERIOD_START_DAY) as u64)
        };

        // start + 10 days always lands on days 4..=7 of the following month
        let next_month = start + Days::new(10);
        let end = next_month + Days::new((PERIOD_START_DAY - 1 - next_month.day()) as u64);

        Self { start, end }
    }

    /// The period right before this one, recomputed from its own anchor.
    pub fn previous(&self) -> Self {
        Self::containing(self.start - Days::new(1))
    }

    pub fn next(&self) -> Self {
        Self::containing(self.end + Days::new(1))
    }

    /// Move `n` periods forward (positive) or backward (negative).
    pub fn offset(&self, n: i32) -> Self {
        let mut p = *self;
        for _ in 0..n.unsigned_abs() {
            p = if n < 0 { p.previous() } else { p.next() };
        }
        p
    }

    /// Inclusive on both ends.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Short key used to group sessions in listings: `Oct 2025 → Nov 2025`.
    pub fn key(&self) -> String {
        format!(
            "{} → {}",
            self.start.format("%b %Y"),
            self.end.format("%b %Y")
        )
    }

    /// Month a report of this period is titled after (the month it ends in).
    pub fn title_month(&self) -> String {
        self.end.format("%B").to_string().to_uppercase()
    }

    pub fn title_year(&self) -> i32 {
        self.end.year()
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%d %b %Y"),
            self.end.format("%d %b %Y")
        )
    }
}
