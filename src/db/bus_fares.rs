use crate::db::date_column;
use crate::errors::AppResult;
use crate::models::bus_fare::BusFareDetail;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Values needed to record one received fare.
#[derive(Debug, Clone)]
pub struct NewSharedFare<'a> {
    pub session_id: &'a str,
    pub receiver_emp_id: &'a str,
    pub date: NaiveDate,
    pub outbound_cost: f64,
    pub return_cost: f64,
    pub sender_emp_id: &'a str,
    pub location_code: &'a str,
}

const SHARED_SELECT: &str = r#"
    SELECT
        b.id,
        b.session_id,
        b.emp_id,
        b.date,
        b.outbound_cost,
        b.return_cost,
        b.shared_from_emp_id,
        COALESCE(u_from.username, b.shared_from_emp) AS shared_from_emp,
        COALESCE(u_to.username, b.shared_to_emp) AS shared_to_emp,
        b.location_code,
        l.location_name,
        b.ticket_fare_claimed
    FROM bus_fare_details b
    LEFT JOIN locations l ON b.location_code = l.location_code
    LEFT JOIN users u_from ON b.shared_from_emp_id = u_from.emp_id
    LEFT JOIN users u_to ON b.shared_to_emp = u_to.emp_id
"#;

fn map_shared(row: &Row) -> rusqlite::Result<BusFareDetail> {
    let date_str: String = row.get("date")?;

    Ok(BusFareDetail {
        id: row.get("id")?,
        session_id: row.get("session_id")?,
        emp_id: row.get("emp_id")?,
        date: date_column(3, &date_str)?,
        outbound_cost: row.get("outbound_cost")?,
        return_cost: row.get("return_cost")?,
        shared_from_emp: row
            .get::<_, Option<String>>("shared_from_emp")?
            .unwrap_or_default(),
        shared_to_emp: row
            .get::<_, Option<String>>("shared_to_emp")?
            .unwrap_or_default(),
        shared_from_emp_id: row.get("shared_from_emp_id")?,
        location_code: row.get("location_code")?,
        location_name: row.get("location_name")?,
        ticket_fare_claimed: row.get::<_, i64>("ticket_fare_claimed")? == 1,
    })
}

/// Record a received fare. Returns `false` when this receiver already holds
/// the same session (re-scan of an ingested payload).
pub fn insert_shared_fare(conn: &Connection, f: &NewSharedFare) -> AppResult<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO bus_fare_details (
            session_id, emp_id, date, outbound_cost, return_cost,
            shared_from_emp, shared_to_emp, location_code, shared_from_emp_id
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            f.session_id,
            f.receiver_emp_id,
            f.date.format("%Y-%m-%d").to_string(),
            f.outbound_cost,
            f.return_cost,
            f.sender_emp_id,
            f.receiver_emp_id,
            f.location_code,
            f.sender_emp_id,
        ],
    )?;
    Ok(n == 1)
}

/// Fares received by the given employee.
pub fn load_shared_fares_for(conn: &Connection, emp_id: &str) -> AppResult<Vec<BusFareDetail>> {
    let sql = format!("{SHARED_SELECT} WHERE b.emp_id = ?1 OR b.shared_to_emp = ?1 ORDER BY b.date DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([emp_id], map_shared)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_shared_fare(conn: &Connection, id: i64) -> AppResult<Option<BusFareDetail>> {
    let sql = format!("{SHARED_SELECT} WHERE b.id = ?1");
    let f = conn.query_row(&sql, [id], map_shared).optional()?;
    Ok(f)
}

pub fn delete_shared_fare(conn: &Connection, id: i64) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM bus_fare_details WHERE id = ?1", [id])?;
    Ok(n)
}

pub fn mark_shared_fare_claimed(
    conn: &Connection,
    session_id: &str,
    receiver_emp_id: &str,
) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE bus_fare_details SET ticket_fare_claimed = 1
         WHERE session_id = ?1 AND shared_to_emp = ?2",
        params![session_id, receiver_emp_id],
    )?;
    Ok(n)
}
