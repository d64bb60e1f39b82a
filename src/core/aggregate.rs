//! Per-period totals for the dashboard: hours, stores, earnings, and the
//! travel cost still waiting to be claimed.

use crate::core::period::PayPeriod;
use crate::models::work_session::LocatedSession;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub current_period: PayPeriod,
    pub previous_period: PayPeriod,
    pub current_hours: f64,
    pub current_stores: usize,
    pub previous_hours: f64,
    pub earnings_kwd: f64,
    pub conversion_rate: f64,
    pub earnings_converted: f64,
    /// Unclaimed outbound + return cost across every date.
    pub claimable_travel_cost: f64,
    /// Sessions logged on `today` (more than one is an anomaly to surface).
    pub sessions_today: usize,
}

impl DashboardSummary {
    pub fn has_multiple_sessions_today(&self) -> bool {
        self.sessions_today > 1
    }
}

fn in_period<'a>(
    sessions: &'a [LocatedSession],
    period: &'a PayPeriod,
) -> impl Iterator<Item = &'a LocatedSession> + 'a {
    sessions.iter().filter(move |s| period.contains(s.session.date))
}

/// Hours summed over sessions (NULL hours count as 0).
pub fn total_hours<'a>(sessions: impl Iterator<Item = &'a LocatedSession>) -> f64 {
    sessions.map(|s| s.session.hours_worked.unwrap_or(0.0)).sum()
}

/// Σ hours × per-location rate, in KWD.
pub fn earnings_kwd<'a>(sessions: impl Iterator<Item = &'a LocatedSession>) -> f64 {
    sessions
        .map(|s| s.session.hours_worked.unwrap_or(0.0) * s.effective_rate())
        .sum()
}

/// Outbound + return over every session whose fare is not claimed yet.
/// Spans every pay period.
pub fn claimable_travel_cost(sessions: &[LocatedSession]) -> f64 {
    sessions
        .iter()
        .filter(|s| !s.session.ticket_fare_claimed)
        .map(|s| s.session.travel_cost())
        .sum()
}

/// Build the dashboard figures from all sessions of one employee.
pub fn summarize(
    sessions: &[LocatedSession],
    today: NaiveDate,
    conversion_rate: f64,
) -> DashboardSummary {
    let current = PayPeriod::containing(today);
    let previous = current.previous();

    let current_hours = total_hours(in_period(sessions, &current));
    let current_stores = in_period(sessions, &current)
        .map(|s| s.session.location_id)
        .collect::<HashSet<_>>()
        .len();
    let previous_hours = total_hours(in_period(sessions, &previous));
    let kwd = earnings_kwd(in_period(sessions, &current));

    DashboardSummary {
        current_period: current,
        previous_period: previous,
        current_hours,
        current_stores,
        previous_hours,
        earnings_kwd: kwd,
        conversion_rate,
        earnings_converted: kwd * conversion_rate,
        claimable_travel_cost: claimable_travel_cost(sessions),
        sessions_today: sessions.iter().filter(|s| s.session.date == today).count(),
    }
}

/// Dates on which more than one session was logged (expected at most one).
pub fn duplicate_days(sessions: &[LocatedSession]) -> Vec<NaiveDate> {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for s in sessions {
        *per_day.entry(s.session.date).or_default() += 1;
    }
    per_day
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(d, _)| d)
        .collect()
}

/// Sessions bucketed by pay period, newest period first.
pub fn group_by_period(sessions: &[LocatedSession]) -> Vec<(PayPeriod, Vec<&LocatedSession>)> {
    let mut groups: BTreeMap<PayPeriod, Vec<&LocatedSession>> = BTreeMap::new();
    for s in sessions {
        groups
            .entry(PayPeriod::containing(s.session.date))
            .or_default()
            .push(s);
    }
    groups.into_iter().rev().collect()
}
