//! Receiver-side and sender-side handling of scanned payloads.

use super::payload::{FareConfirmation, FareShare, PayloadUser};
use crate::core::context::UserContext;
use crate::db::bus_fares::{NewSharedFare, insert_shared_fare};
use crate::db::locations::location_exists;
use crate::db::log::ttlog;
use crate::db::sessions::mark_fare_claimed_for;
use crate::db::users::upsert_user;
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use rusqlite::Connection;

#[derive(Debug, Clone, PartialEq)]
pub struct Ingested {
    pub confirmation: FareConfirmation,
    /// Rows added to bus_fare_details.
    pub inserted: usize,
    /// Sessions this device already held (re-scan).
    pub already_present: usize,
}

/// Location codes of the payload unknown on this device, as `code (name)`.
pub fn missing_locations(conn: &Connection, share: &FareShare) -> AppResult<Vec<String>> {
    let mut missing = Vec::new();
    for s in &share.sessions {
        if location_exists(conn, &s.location_code)? {
            continue;
        }
        let label = if s.location_name.is_empty() {
            s.location_code.clone()
        } else {
            format!("{} ({})", s.location_code, s.location_name)
        };
        if !missing.contains(&label) {
            missing.push(label);
        }
    }
    Ok(missing)
}

/// Store a received `fare_share` and build the confirmation for the sender.
///
/// Every location code is checked before anything is written; one missing
/// code aborts the whole payload.
pub fn ingest_share(
    conn: &mut Connection,
    me: &UserContext,
    share: &FareShare,
) -> AppResult<Ingested> {
    let missing = missing_locations(conn, share)?;
    if !missing.is_empty() {
        return Err(AppError::MissingLocations(missing));
    }

    let mut dates = Vec::with_capacity(share.sessions.len());
    for s in &share.sessions {
        let d = NaiveDate::parse_from_str(&s.date, "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDate(s.date.clone()))?;
        dates.push(d);
    }

    let tx = conn.transaction()?;
    upsert_user(&tx, &share.from_user.emp_id, &share.from_user.username)?;

    let mut inserted = 0;
    for (s, date) in share.sessions.iter().zip(dates) {
        let row = NewSharedFare {
            session_id: &s.session_id,
            receiver_emp_id: &me.emp_id,
            date,
            outbound_cost: s.outbound_cost,
            return_cost: s.return_cost,
            sender_emp_id: &share.from_user.emp_id,
            location_code: &s.location_code,
        };
        if insert_shared_fare(&tx, &row)? {
            inserted += 1;
        }
    }

    ttlog(
        &tx,
        "receive",
        &share.from_user.emp_id,
        &format!(
            "Received {} fares ({} new) from {}",
            share.sessions.len(),
            inserted,
            share.from_user.username
        ),
    )?;
    tx.commit()?;

    Ok(Ingested {
        confirmation: FareConfirmation {
            received_sessions: share
                .sessions
                .iter()
                .map(|s| s.session_id.clone())
                .collect(),
            from_user: share.from_user.clone(),
            to_user: PayloadUser {
                emp_id: me.emp_id.clone(),
                username: me.username.clone(),
            },
        },
        inserted,
        already_present: share.sessions.len() - inserted,
    })
}

/// Close the loop on the sender: the listed sessions become claimed by the
/// receiver. Returns the number of rows updated.
///
/// Only the logged-in employee's own sessions are touched. A confirmation
/// addressed to someone else is rejected before any write.
pub fn apply_confirmation(
    conn: &mut Connection,
    me: &UserContext,
    confirmation: &FareConfirmation,
) -> AppResult<usize> {
    if confirmation.from_user.emp_id != me.emp_id {
        return Err(AppError::Handoff(format!(
            "confirmation is addressed to {} ({}), logged in as {}",
            confirmation.from_user.username, confirmation.from_user.emp_id, me.emp_id
        )));
    }

    let to = &confirmation.to_user;
    let tx = conn.transaction()?;
    upsert_user(&tx, &to.emp_id, &to.username)?;

    let mut updated = 0;
    for id in &confirmation.received_sessions {
        updated += mark_fare_claimed_for(&tx, &me.emp_id, id, &to.emp_id)?;
    }

    ttlog(
        &tx,
        "confirm",
        &to.emp_id,
        &format!("{updated} fares claimed by {}", to.username),
    )?;
    tx.commit()?;

    Ok(updated)
}
