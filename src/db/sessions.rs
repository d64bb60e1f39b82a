use crate::db::date_column;
use crate::errors::AppResult;
use crate::models::work_session::{LocatedSession, WorkSession};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

const SESSION_COLUMNS: &str = "w.session_id, w.emp_id, w.location_id, w.date, w.tap_in, w.tap_out,
     w.hours_worked, w.outbound_cost, w.return_cost, w.ticket_fare, w.claimed_by,
     w.timesheet_submitted, w.ticket_fare_claimed";

pub fn map_session(row: &Row) -> rusqlite::Result<WorkSession> {
    let date_str: String = row.get("date")?;

    Ok(WorkSession {
        session_id: row.get("session_id")?,
        emp_id: row.get("emp_id")?,
        location_id: row.get("location_id")?,
        date: date_column(3, &date_str)?,
        tap_in: row.get("tap_in")?,
        tap_out: row.get("tap_out")?,
        hours_worked: row.get("hours_worked")?,
        outbound_cost: row.get::<_, Option<f64>>("outbound_cost")?.unwrap_or(0.0),
        return_cost: row.get::<_, Option<f64>>("return_cost")?.unwrap_or(0.0),
        ticket_fare: row.get::<_, Option<f64>>("ticket_fare")?.unwrap_or(0.0),
        claimed_by: row.get("claimed_by")?,
        timesheet_submitted: row.get::<_, i64>("timesheet_submitted")? == 1,
        ticket_fare_claimed: row.get::<_, i64>("ticket_fare_claimed")? == 1,
    })
}

fn map_located(row: &Row) -> rusqlite::Result<LocatedSession> {
    Ok(LocatedSession {
        session: map_session(row)?,
        location_code: row.get("location_code")?,
        location_name: row.get("location_name")?,
        hourly_rate: row.get("hourly_rate")?,
    })
}

pub fn insert_session(conn: &Connection, s: &WorkSession) -> AppResult<()> {
    conn.execute(
        "INSERT INTO work_sessions
            (session_id, emp_id, location_id, date, tap_in, tap_out, hours_worked,
             outbound_cost, return_cost, ticket_fare)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            s.session_id,
            s.emp_id,
            s.location_id,
            s.date_str(),
            s.tap_in,
            s.tap_out,
            s.hours_worked,
            s.outbound_cost,
            s.return_cost,
            s.ticket_fare,
        ],
    )?;
    Ok(())
}

/// Update the editable fields of a session (flags are only changed through
/// the verification gate or the hand-off confirmation).
pub fn update_session(conn: &Connection, s: &WorkSession) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE work_sessions
         SET location_id = ?1, date = ?2, tap_in = ?3, tap_out = ?4, hours_worked = ?5,
             outbound_cost = ?6, return_cost = ?7, ticket_fare = ?8
         WHERE session_id = ?9",
        params![
            s.location_id,
            s.date_str(),
            s.tap_in,
            s.tap_out,
            s.hours_worked,
            s.outbound_cost,
            s.return_cost,
            s.ticket_fare,
            s.session_id,
        ],
    )?;
    Ok(n)
}

pub fn load_session(conn: &Connection, session_id: &str) -> AppResult<Option<WorkSession>> {
    let sql = format!("SELECT {SESSION_COLUMNS} FROM work_sessions w WHERE w.session_id = ?1");
    let s = conn.query_row(&sql, [session_id], map_session).optional()?;
    Ok(s)
}

pub fn delete_session(conn: &Connection, session_id: &str) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM work_sessions WHERE session_id = ?1",
        [session_id],
    )?;
    Ok(n)
}

/// Sessions of one employee joined with their location, newest first.
/// `range` is inclusive on both ends and compares ISO date strings.
pub fn load_located_sessions(
    conn: &Connection,
    emp_id: &str,
    range: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<LocatedSession>> {
    let base = format!(
        "SELECT {SESSION_COLUMNS}, l.location_code, l.location_name, l.hourly_rate
         FROM work_sessions w
         JOIN locations l ON w.location_id = l.location_id
         WHERE w.emp_id = ?1"
    );

    let mut out = Vec::new();
    match range {
        Some((start, end)) => {
            let sql = format!("{base} AND w.date BETWEEN ?2 AND ?3 ORDER BY w.date DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                params![
                    emp_id,
                    start.format("%Y-%m-%d").to_string(),
                    end.format("%Y-%m-%d").to_string()
                ],
                map_located,
            )?;
            for r in rows {
                out.push(r?);
            }
        }
        None => {
            let sql = format!("{base} ORDER BY w.date DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([emp_id], map_located)?;
            for r in rows {
                out.push(r?);
            }
        }
    }
    Ok(out)
}

/// Every session on the device, every employee (admin listing).
pub fn load_all_sessions(conn: &Connection) -> AppResult<Vec<WorkSession>> {
    let sql = format!("SELECT {SESSION_COLUMNS} FROM work_sessions w ORDER BY w.date DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_session)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn sessions_on(conn: &Connection, emp_id: &str, date: NaiveDate) -> AppResult<Vec<WorkSession>> {
    let sql = format!(
        "SELECT {SESSION_COLUMNS} FROM work_sessions w WHERE w.emp_id = ?1 AND w.date = ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![emp_id, date.format("%Y-%m-%d").to_string()],
        map_session,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn mark_fare_claimed(conn: &Connection, session_id: &str, claimed_by: &str) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE work_sessions SET ticket_fare_claimed = 1, claimed_by = ?1 WHERE session_id = ?2",
        params![claimed_by, session_id],
    )?;
    Ok(n)
}

/// Same as [`mark_fare_claimed`], restricted to the sessions of `owner`.
pub fn mark_fare_claimed_for(
    conn: &Connection,
    owner: &str,
    session_id: &str,
    claimed_by: &str,
) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE work_sessions SET ticket_fare_claimed = 1, claimed_by = ?1
         WHERE session_id = ?2 AND emp_id = ?3",
        params![claimed_by, session_id, owner],
    )?;
    Ok(n)
}

pub fn mark_timesheet_submitted(conn: &Connection, session_id: &str) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE work_sessions SET timesheet_submitted = 1 WHERE session_id = ?1",
        [session_id],
    )?;
    Ok(n)
}
