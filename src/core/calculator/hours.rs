//! Worked-hours computation from tap-in / tap-out clock strings.

use crate::utils::time::parse_clock;
use chrono::{Duration, NaiveDate, NaiveTime};

/// Minutes over the hour up to which the remainder is dropped.
const DROP_UP_TO: i64 = 15;
/// First remainder (in minutes) that rounds up to the next full hour.
const FULL_HOUR_FROM: i64 = 46;

/// Hours worked between two stored tap times on `date`.
///
/// Returns 0 when either end is missing or unparsable: callers treat 0 as
/// "unknown", not as a zero-length shift. A tap-out at or before the tap-in
/// is taken to be on the following day.
pub fn calculate_hours_worked(tap_in: Option<&str>, tap_out: Option<&str>, date: NaiveDate) -> f64 {
    let (Some(tap_in), Some(tap_out)) = (tap_in, tap_out) else {
        return 0.0;
    };
    let (Some(start), Some(end)) = (parse_clock(tap_in), parse_clock(tap_out)) else {
        return 0.0;
    };

    hours_between(date, start, end)
}

/// Same as [`calculate_hours_worked`] for already parsed times.
pub fn hours_between(date: NaiveDate, tap_in: NaiveTime, tap_out: NaiveTime) -> f64 {
    let start = date.and_time(tap_in);
    let mut end = date.and_time(tap_out);

    if end <= start {
        end += Duration::days(1);
    }

    round_worked_minutes((end - start).num_minutes())
}

/// Round a raw duration to the payroll grid:
/// remainder `m` over the full hour `h`: `m <= 15 → h`, `15 < m < 46 → h + 0.5`,
/// `m >= 46 → h + 1`.
pub fn round_worked_minutes(total_minutes: i64) -> f64 {
    if total_minutes <= 0 {
        return 0.0;
    }

    let h = (total_minutes / 60) as f64;
    let m = total_minutes % 60;

    if m <= DROP_UP_TO {
        h
    } else if m < FULL_HOUR_FROM {
        h + 0.5
    } else {
        h + 1.0
    }
}
