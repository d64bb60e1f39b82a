//! Tap-out suggestions for a shift that has only been tapped in.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::Serialize;

/// Minutes subtracted from the ideal end so the rounding still lands on
/// the target length.
const TOLERANCE_MINUTES: i64 = 14;
const SHORTEST_SHIFT: f64 = 3.0;
const LONGEST_SHIFT: f64 = 13.0;
const EARLIEST_HOUR: u32 = 8;
const LATEST_HOUR: u32 = 23;
const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TapOutSuggestion {
    pub hours_worked: f64,
    pub time: NaiveDateTime,
}

/// Candidate tap-out times for shift lengths 3.0h..=13.0h in half-hour steps.
///
/// Candidates whose clock hour falls outside 08..=23 are dropped; the five
/// longest survivors are returned, shortest first.
pub fn suggest_tap_out_times(tap_in: NaiveDateTime) -> Vec<TapOutSuggestion> {
    let steps = ((LONGEST_SHIFT - SHORTEST_SHIFT) * 2.0) as usize;

    let all: Vec<TapOutSuggestion> = (0..=steps)
        .map(|i| SHORTEST_SHIFT + i as f64 * 0.5)
        .filter_map(|hours| {
            let ideal_end = tap_in + Duration::minutes((hours * 60.0) as i64);
            let earliest = ideal_end - Duration::minutes(TOLERANCE_MINUTES);

            (EARLIEST_HOUR..=LATEST_HOUR)
                .contains(&earliest.hour())
                .then_some(TapOutSuggestion {
                    hours_worked: hours,
                    time: earliest,
                })
        })
        .collect();

    let skip = all.len().saturating_sub(MAX_SUGGESTIONS);
    all.into_iter().skip(skip).collect()
}
