use crate::errors::AppResult;
use crate::models::user::User;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        user_id: row.get("user_id")?,
        emp_id: row.get("emp_id")?,
        username: row.get("username")?,
    })
}

pub fn find_by_emp_id(conn: &Connection, emp_id: &str) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT user_id, emp_id, username FROM users WHERE emp_id = ?1",
            [emp_id],
            map_user,
        )
        .optional()?;
    Ok(user)
}

pub fn insert_user(conn: &Connection, emp_id: &str, username: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO users (emp_id, username) VALUES (?1, ?2)",
        params![emp_id, username],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert the user, or refresh the username when the emp_id is already known.
pub fn upsert_user(conn: &Connection, emp_id: &str, username: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO users (emp_id, username) VALUES (?1, ?2)
         ON CONFLICT(emp_id) DO UPDATE SET username = excluded.username",
        params![emp_id, username],
    )?;
    Ok(())
}

pub fn list_users(conn: &Connection) -> AppResult<Vec<User>> {
    let mut stmt = conn.prepare("SELECT user_id, emp_id, username FROM users ORDER BY emp_id")?;
    let rows = stmt.query_map([], map_user)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
