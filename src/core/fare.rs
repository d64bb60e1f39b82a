//! Own sessions and received fares merged into one list, and the fare
//! claim report built from a selection of it.

use crate::core::context::UserContext;
use crate::core::verify::GatedMutation;
use crate::db::bus_fares::load_shared_fares_for;
use crate::db::locations::list_locations;
use crate::db::sessions::load_located_sessions;
use crate::errors::{AppError, AppResult};
use crate::export::ReportRow;
use crate::models::bus_fare::BusFareDetail;
use crate::models::unified_fare::{FareSource, UnifiedFare};
use crate::models::work_session::LocatedSession;
use rusqlite::Connection;
use std::collections::HashMap;

const UNKNOWN_LOCATION: &str = "Unknown";

impl From<&LocatedSession> for UnifiedFare {
    fn from(s: &LocatedSession) -> Self {
        UnifiedFare {
            session_id: s.session.session_id.clone(),
            source: FareSource::Own,
            shared_row_id: None,
            emp_id: s.session.emp_id.clone(),
            date: s.session.date,
            outbound_cost: s.session.outbound_cost,
            return_cost: s.session.return_cost,
            location_code: Some(s.location_code.clone()),
            location_name: Some(s.location_name.clone()),
            shared_from_emp: None,
            shared_from_emp_id: None,
            shared_to_emp: None,
            ticket_fare_claimed: s.session.ticket_fare_claimed,
            claimed_by: s.session.claimed_by.clone(),
        }
    }
}

impl From<&BusFareDetail> for UnifiedFare {
    fn from(b: &BusFareDetail) -> Self {
        UnifiedFare {
            session_id: b.session_id.clone(),
            source: FareSource::Shared,
            shared_row_id: Some(b.id),
            emp_id: b.emp_id.clone(),
            date: b.date,
            outbound_cost: b.outbound_cost,
            return_cost: b.return_cost,
            location_code: Some(b.location_code.clone()),
            location_name: b.location_name.clone(),
            shared_from_emp: Some(b.shared_from_emp.clone()),
            shared_from_emp_id: Some(b.shared_from_emp_id.clone()),
            shared_to_emp: Some(b.shared_to_emp.clone()),
            ticket_fare_claimed: b.ticket_fare_claimed,
            claimed_by: None,
        }
    }
}

/// Merge both sources keyed by `session_id`, newest first.
///
/// Own sessions without any travel cost are left out. A received entry
/// replaces an own one with the same id.
pub fn merge_fares(own: &[LocatedSession], shared: &[BusFareDetail]) -> Vec<UnifiedFare> {
    let mut order: Vec<String> = Vec::new();
    let mut by_id: HashMap<String, UnifiedFare> = HashMap::new();

    let own = own
        .iter()
        .filter(|s| s.session.travel_cost() != 0.0)
        .map(UnifiedFare::from);
    let shared = shared.iter().map(UnifiedFare::from);

    for fare in own.chain(shared) {
        if !by_id.contains_key(&fare.session_id) {
            order.push(fare.session_id.clone());
        }
        by_id.insert(fare.session_id.clone(), fare);
    }

    let mut merged: Vec<UnifiedFare> = order
        .into_iter()
        .filter_map(|id| by_id.remove(&id))
        .collect();
    merged.sort_by(|a, b| b.date.cmp(&a.date));
    merged
}

pub fn load_unified(conn: &Connection, user: &UserContext) -> AppResult<Vec<UnifiedFare>> {
    let own = load_located_sessions(conn, &user.emp_id, None)?;
    let shared = load_shared_fares_for(conn, &user.emp_id)?;
    Ok(merge_fares(&own, &shared))
}

/// Pick fares by session id, in the order given. Unknown ids are an error.
pub fn select_fares(fares: &[UnifiedFare], ids: &[String]) -> AppResult<Vec<UnifiedFare>> {
    if ids.is_empty() {
        return Err(AppError::EmptySelection(
            "please select at least one fare".into(),
        ));
    }

    let mut selected = Vec::with_capacity(ids.len());
    for id in ids {
        let fare = fares
            .iter()
            .find(|f| &f.session_id == id)
            .ok_or_else(|| AppError::UnknownSession(id.clone()))?;
        if !selected.iter().any(|f: &UnifiedFare| f.session_id == *id) {
            selected.push(fare.clone());
        }
    }
    Ok(selected)
}

/// `(YYYY-MM, fares)` buckets, newest month first.
pub fn group_by_month(fares: &[UnifiedFare]) -> Vec<(String, Vec<&UnifiedFare>)> {
    let mut groups: Vec<(String, Vec<&UnifiedFare>)> = Vec::new();
    for f in fares {
        let key = f.month_key();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, list)) => list.push(f),
            None => groups.push((key, vec![f])),
        }
    }
    groups.sort_by(|a, b| b.0.cmp(&a.0));
    groups
}

/// Report rows of the selected fares.
///
/// A received fare is attributed to its sender. The location is resolved
/// from its code on this device.
pub fn fare_report_rows(
    conn: &Connection,
    user: &UserContext,
    selected: &[UnifiedFare],
) -> AppResult<Vec<ReportRow>> {
    let names: HashMap<String, String> = list_locations(conn)?
        .into_iter()
        .map(|l| (l.location_code, l.location_name))
        .collect();

    let rows = selected
        .iter()
        .map(|f| {
            let (emp_id, name) = if f.is_shared() {
                (
                    f.shared_from_emp_id.clone().unwrap_or_default(),
                    f.shared_from_emp.clone().unwrap_or_default(),
                )
            } else {
                (user.emp_id.clone(), user.username.clone())
            };

            let location = f
                .location_code
                .as_ref()
                .and_then(|c| names.get(c))
                .cloned()
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

            ReportRow {
                emp_id,
                name,
                location,
                date: f.date,
                value: f.total_fare(),
            }
        })
        .collect();

    Ok(rows)
}

/// Flag update applied once the fare report is confirmed.
pub fn claim_mutation(user: &UserContext, selected: &[UnifiedFare]) -> GatedMutation {
    let mut own_sessions = Vec::new();
    let mut shared_sessions = Vec::new();

    for f in selected {
        match f.source {
            FareSource::Own => own_sessions.push(f.session_id.clone()),
            FareSource::Shared => {
                shared_sessions.push((f.session_id.clone(), user.emp_id.clone()))
            }
        }
    }

    GatedMutation::MarkFareClaimed {
        own_sessions,
        shared_sessions,
        claimed_by: user.emp_id.clone(),
    }
}
