//! Key-value preferences (current user marker, per-user settings).

use crate::errors::AppResult;
use rusqlite::{Connection, OptionalExtension, params};

/// Key holding the emp_id of the logged-in employee.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Per-user key of the KWD conversion rate.
pub fn conversion_rate_key(user_id: i64) -> String {
    format!("conversionRate_{user_id}")
}

pub fn get_pref(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let v = conn
        .query_row("SELECT value FROM preferences WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_pref(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO preferences (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn remove_pref(conn: &Connection, key: &str) -> AppResult<()> {
    conn.execute("DELETE FROM preferences WHERE key = ?1", [key])?;
    Ok(())
}
