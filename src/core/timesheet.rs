//! Timesheets of one pay period, split by location group.

use crate::config::Config;
use crate::core::context::UserContext;
use crate::core::period::PayPeriod;
use crate::core::verify::GatedMutation;
use crate::db::sessions::load_located_sessions;
use crate::errors::AppResult;
use crate::export::ReportRow;
use crate::models::work_session::LocatedSession;
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct TimesheetGroup {
    pub name: String,
    /// Oldest first.
    pub sessions: Vec<LocatedSession>,
}

/// Summary shown for each group before exporting.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCard {
    pub name: String,
    pub work_days: usize,
    pub submitted: usize,
    pub total_hours: f64,
    /// `Oct 26,27` / `Nov 3,4,9`
    pub date_lines: Vec<String>,
}

/// Sessions of the pay period grouped by their location group.
pub fn load_period_groups(
    conn: &Connection,
    cfg: &Config,
    user: &UserContext,
    period: &PayPeriod,
) -> AppResult<Vec<TimesheetGroup>> {
    let mut sessions = load_located_sessions(conn, &user.emp_id, Some((period.start, period.end)))?;
    sessions.reverse();
    Ok(group_sessions(cfg, sessions))
}

pub fn group_sessions(cfg: &Config, sessions: Vec<LocatedSession>) -> Vec<TimesheetGroup> {
    let mut groups: BTreeMap<String, Vec<LocatedSession>> = BTreeMap::new();
    for s in sessions {
        groups
            .entry(cfg.location_group(&s.location_name))
            .or_default()
            .push(s);
    }
    groups
        .into_iter()
        .map(|(name, sessions)| TimesheetGroup { name, sessions })
        .collect()
}

impl TimesheetGroup {
    pub fn card(&self) -> GroupCard {
        GroupCard {
            name: self.name.clone(),
            work_days: self.sessions.len(),
            submitted: self
                .sessions
                .iter()
                .filter(|s| s.session.timesheet_submitted)
                .count(),
            total_hours: self
                .sessions
                .iter()
                .map(|s| s.session.hours_worked.unwrap_or(0.0))
                .sum(),
            date_lines: compact_date_lines(self.sessions.iter().map(|s| s.session.date)),
        }
    }

    /// One value per date: the hours of that day added up.
    pub fn report_rows(&self, user: &UserContext) -> Vec<ReportRow> {
        let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for s in &self.sessions {
            *per_day.entry(s.session.date).or_default() += s.session.hours_worked.unwrap_or(0.0);
        }

        per_day
            .into_iter()
            .map(|(date, hours)| ReportRow {
                emp_id: user.emp_id.clone(),
                name: user.username.clone(),
                location: self.name.clone(),
                date,
                value: hours,
            })
            .collect()
    }

    pub fn submit_mutation(&self) -> GatedMutation {
        GatedMutation::MarkTimesheetSubmitted {
            sessions: self
                .sessions
                .iter()
                .map(|s| s.session.session_id.clone())
                .collect(),
        }
    }
}

/// Distinct dates as one line per month, in calendar order.
pub fn compact_date_lines(dates: impl Iterator<Item = NaiveDate>) -> Vec<String> {
    let mut by_month: BTreeMap<(i32, u32), Vec<u32>> = BTreeMap::new();
    for d in dates {
        let days = by_month.entry((d.year(), d.month())).or_default();
        if !days.contains(&d.day()) {
            days.push(d.day());
        }
    }

    by_month
        .into_iter()
        .filter_map(|((y, m), mut days)| {
            days.sort_unstable();
            let first = NaiveDate::from_ymd_opt(y, m, 1)?;
            let list = days
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(",");
            Some(format!("{} {}", first.format("%b"), list))
        })
        .collect()
}
