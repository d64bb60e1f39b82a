use crate::errors::{AppError, AppResult};
use crate::models::location::{FAHAHEEL_RATE, STANDARD_RATE};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, params};

/// Stores provisioned on every fresh device, so that hand-offs between two
/// new installations resolve the same codes.
const STOCK_LOCATIONS: &[(&str, &str)] = &[
    ("801", "City 1"),
    ("802", "Fahaheel"),
    ("809", "Farwaniya 1"),
    ("818", "Shuwaikh"),
    ("822", "Farwaniya 3"),
    ("821", "Hawally 6"),
    ("804", "Jaleeb"),
    ("806", "Khaitan"),
    ("808", "Mahboula 2"),
    ("814", "Mangaf"),
    ("823", "Mirqab"),
    ("811", "Souq Al Kabeer"),
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Create the core tables with the current schema.
fn create_base_schema(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id   INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            emp_id    TEXT NOT NULL UNIQUE,
            username  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS locations (
            location_id    INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            location_code  TEXT NOT NULL UNIQUE,
            location_name  TEXT NOT NULL,
            hourly_rate    REAL
        );

        CREATE TABLE IF NOT EXISTS work_sessions (
            session_id           TEXT PRIMARY KEY NOT NULL,
            emp_id               TEXT NOT NULL,
            location_id          INTEGER NOT NULL,
            date                 TEXT NOT NULL,
            tap_in               TEXT,
            tap_out              TEXT,
            hours_worked         REAL,
            outbound_cost        REAL NOT NULL DEFAULT 0,
            return_cost          REAL NOT NULL DEFAULT 0,
            ticket_fare          REAL NOT NULL DEFAULT 0,
            claimed_by           TEXT,
            timesheet_submitted  INTEGER NOT NULL DEFAULT 0,
            ticket_fare_claimed  INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY(emp_id) REFERENCES users(emp_id),
            FOREIGN KEY(location_id) REFERENCES locations(location_id)
        );

        CREATE INDEX IF NOT EXISTS idx_work_sessions_emp_date ON work_sessions(emp_id, date);

        CREATE TABLE IF NOT EXISTS bus_fare_details (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            session_id           TEXT NOT NULL,
            emp_id               TEXT NOT NULL,
            date                 TEXT NOT NULL,
            outbound_cost        REAL NOT NULL DEFAULT 0,
            return_cost          REAL NOT NULL DEFAULT 0,
            shared_from_emp      TEXT,
            shared_to_emp        TEXT NOT NULL,
            shared_from_emp_id   TEXT NOT NULL,
            location_code        TEXT NOT NULL,
            ticket_fare_claimed  INTEGER NOT NULL DEFAULT 0
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_bus_fare_session_receiver
            ON bus_fare_details(session_id, shared_to_emp);

        CREATE TABLE IF NOT EXISTS preferences (
            key    TEXT PRIMARY KEY NOT NULL,
            value  TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        params![version, message],
    )?;
    Ok(())
}

fn locations_has_rate_column(conn: &Connection) -> AppResult<bool> {
    let mut stmt = conn.prepare("PRAGMA table_info('locations')")?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == "hourly_rate" {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Give every location its own hourly rate, backfilled with the historical
/// name-based rule so earnings of existing rows do not move.
fn migrate_add_location_rate(conn: &Connection) -> AppResult<()> {
    let version = "20251101_0002_location_hourly_rate";

    if is_applied(conn, version)? {
        return Ok(());
    }

    // fresh databases get the column from the base schema
    let altered = !locations_has_rate_column(conn)?;
    if altered {
        conn.execute("ALTER TABLE locations ADD COLUMN hourly_rate REAL", [])
            .map_err(|e| AppError::Migration(format!("Failed to add 'hourly_rate': {e}")))?;
    }

    conn.execute(
        "UPDATE locations
         SET hourly_rate = CASE
             WHEN lower(location_name) LIKE '%fahaheel%' THEN ?1
             ELSE ?2
         END
         WHERE hourly_rate IS NULL",
        params![FAHAHEEL_RATE, STANDARD_RATE],
    )?;

    mark_applied(conn, version, "Added hourly_rate to locations")?;

    if altered {
        success(format!(
            "Migration applied: {} → added 'hourly_rate' to locations table",
            version
        ));
    }

    Ok(())
}

/// Seed the stock stores when the table is empty.
fn seed_locations(conn: &Connection) -> AppResult<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }

    let mut stmt = conn.prepare(
        "INSERT INTO locations (location_code, location_name, hourly_rate) VALUES (?1, ?2, ?3)",
    )?;
    for (code, name) in STOCK_LOCATIONS {
        stmt.execute(params![
            code,
            name,
            crate::models::location::legacy_rate_for(name)
        ])?;
    }

    mark_applied(conn, "seed_locations", "Locations table seeded")?;
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;
    create_base_schema(conn)?;
    migrate_add_location_rate(conn)?;
    seed_locations(conn)?;
    Ok(())
}
