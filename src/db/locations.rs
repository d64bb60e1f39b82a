use crate::errors::AppResult;
use crate::models::location::{Location, legacy_rate_for};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_location(row: &Row) -> rusqlite::Result<Location> {
    Ok(Location {
        location_id: row.get("location_id")?,
        location_code: row.get("location_code")?,
        location_name: row.get("location_name")?,
        hourly_rate: row.get("hourly_rate")?,
    })
}

pub fn list_locations(conn: &Connection) -> AppResult<Vec<Location>> {
    let mut stmt = conn.prepare(
        "SELECT location_id, location_code, location_name, hourly_rate
         FROM locations ORDER BY location_code",
    )?;
    let rows = stmt.query_map([], map_location)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_by_code(conn: &Connection, code: &str) -> AppResult<Option<Location>> {
    let loc = conn
        .query_row(
            "SELECT location_id, location_code, location_name, hourly_rate
             FROM locations WHERE location_code = ?1",
            [code.trim()],
            map_location,
        )
        .optional()?;
    Ok(loc)
}

pub fn location_exists(conn: &Connection, code: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM locations WHERE location_code = ?1")?;
    Ok(stmt.exists([code.trim()])?)
}

/// Insert a location. Without an explicit rate the historical name rule applies.
pub fn insert_location(
    conn: &Connection,
    code: &str,
    name: &str,
    rate: Option<f64>,
) -> AppResult<i64> {
    let rate = rate.unwrap_or_else(|| legacy_rate_for(name));
    conn.execute(
        "INSERT INTO locations (location_code, location_name, hourly_rate) VALUES (?1, ?2, ?3)",
        params![code.trim(), name.trim(), rate],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn set_rate(conn: &Connection, code: &str, rate: f64) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE locations SET hourly_rate = ?1 WHERE location_code = ?2",
        params![rate, code.trim()],
    )?;
    Ok(n)
}
