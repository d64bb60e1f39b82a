use crate::core::calculator::hours::calculate_hours_worked;
use crate::core::context::UserContext;
use crate::db::locations::find_by_code;
use crate::db::log::ttlog;
use crate::db::sessions::{insert_session, load_session, sessions_on, update_session};
use crate::errors::{AppError, AppResult};
use crate::models::work_session::WorkSession;
use crate::ui::messages::{success, warning};
use chrono::NaiveDate;
use rand::Rng;
use rand::distributions::Alphanumeric;
use rusqlite::Connection;

const SESSION_ID_LEN: usize = 8;

/// Fields typed by the user. `None` keeps the stored value when editing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionInput {
    pub date: Option<NaiveDate>,
    pub location_code: Option<String>,
    /// Already normalized to `h:mm AM/PM`.
    pub tap_in: Option<String>,
    pub tap_out: Option<String>,
    pub outbound_cost: Option<f64>,
    pub return_cost: Option<f64>,
}

/// Parse a travel cost typed on the command line.
pub fn parse_amount(raw: Option<&String>) -> AppResult<Option<f64>> {
    match raw {
        None => Ok(None),
        Some(s) => {
            let v: f64 = s
                .trim()
                .parse()
                .map_err(|_| AppError::InvalidAmount(s.clone()))?;
            if !v.is_finite() || v < 0.0 {
                return Err(AppError::InvalidAmount(s.clone()));
            }
            Ok(Some(v))
        }
    }
}

/// 8 lowercase alphanumeric characters.
pub fn new_session_id<R: Rng>(rng: &mut R) -> String {
    (0..SESSION_ID_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_lowercase())
        .collect()
}

/// Hours and fare follow the taps and the costs.
fn recompute(s: &mut WorkSession) {
    s.hours_worked = match (&s.tap_in, &s.tap_out) {
        (Some(i), Some(o)) => Some(calculate_hours_worked(
            Some(i.as_str()),
            Some(o.as_str()),
            s.date,
        )),
        _ => None,
    };
    s.ticket_fare = s.outbound_cost + s.return_cost;
}

/// High-level business logic for the `add` command.
pub struct AddLogic;

impl AddLogic {
    pub fn add(
        conn: &Connection,
        user: &UserContext,
        input: &SessionInput,
    ) -> AppResult<WorkSession> {
        let date = input
            .date
            .ok_or_else(|| AppError::InvalidDate("a date is required".into()))?;
        let code = input
            .location_code
            .as_deref()
            .ok_or_else(|| AppError::UnknownLocation("a location code is required".into()))?;
        let location =
            find_by_code(conn, code)?.ok_or_else(|| AppError::UnknownLocation(code.to_string()))?;

        let mut session = WorkSession {
            session_id: new_session_id(&mut rand::thread_rng()),
            emp_id: user.emp_id.clone(),
            location_id: location.location_id,
            date,
            tap_in: input.tap_in.clone(),
            tap_out: input.tap_out.clone(),
            hours_worked: None,
            outbound_cost: input.outbound_cost.unwrap_or(0.0),
            return_cost: input.return_cost.unwrap_or(0.0),
            ticket_fare: 0.0,
            claimed_by: None,
            timesheet_submitted: false,
            ticket_fare_claimed: false,
        };
        recompute(&mut session);

        insert_session(conn, &session)?;
        ttlog(
            conn,
            "add",
            &session.session_id,
            &format!(
                "{} at {} ({})",
                session.date_str(),
                location.location_code,
                location.location_name
            ),
        )?;

        success(format!(
            "Session {} saved for {} at {}.",
            session.session_id,
            session.date_str(),
            location.location_name
        ));
        warn_if_duplicate(conn, &user.emp_id, date)?;

        Ok(session)
    }

    pub fn edit(
        conn: &Connection,
        user: &UserContext,
        session_id: &str,
        input: &SessionInput,
    ) -> AppResult<WorkSession> {
        let mut session = load_session(conn, session_id)?
            .filter(|s| s.emp_id == user.emp_id)
            .ok_or_else(|| AppError::UnknownSession(session_id.to_string()))?;

        if let Some(code) = &input.location_code {
            let location = find_by_code(conn, code)?
                .ok_or_else(|| AppError::UnknownLocation(code.to_string()))?;
            session.location_id = location.location_id;
        }
        if let Some(d) = input.date {
            session.date = d;
        }
        if let Some(t) = &input.tap_in {
            session.tap_in = Some(t.clone());
        }
        if let Some(t) = &input.tap_out {
            session.tap_out = Some(t.clone());
        }
        if let Some(v) = input.outbound_cost {
            session.outbound_cost = v;
        }
        if let Some(v) = input.return_cost {
            session.return_cost = v;
        }
        recompute(&mut session);

        update_session(conn, &session)?;
        ttlog(conn, "edit", &session.session_id, &format!("Updated {}", session.date_str()))?;

        success(format!("✏️ Session {} updated.", session.session_id));
        warn_if_duplicate(conn, &user.emp_id, session.date)?;

        Ok(session)
    }
}

/// More than one session on a day is surfaced, never merged.
fn warn_if_duplicate(conn: &Connection, emp_id: &str, date: NaiveDate) -> AppResult<()> {
    let n = sessions_on(conn, emp_id, date)?.len();
    if n > 1 {
        warning(format!(
            "Multiple work sessions detected for {} ({} sessions).",
            date.format("%Y-%m-%d"),
            n
        ));
    }
    Ok(())
}
