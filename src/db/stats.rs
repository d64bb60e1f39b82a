use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour::{Cyan, Green, Yellow};
use rusqlite::OptionalExtension;
use std::fs;

fn count(pool: &DbPool, table: &str) -> AppResult<i64> {
    let n = pool
        .conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
    Ok(n)
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{} {}", Cyan.paint("• File:"), Yellow.paint(db_path));
    println!("{} {:.1} KB", Cyan.paint("• Size:"), file_kb);

    for (label, table) in [
        ("Users", "users"),
        ("Locations", "locations"),
        ("Work sessions", "work_sessions"),
        ("Received fares", "bus_fare_details"),
    ] {
        let n = count(pool, table)?;
        println!(
            "{} {}",
            Cyan.paint(format!("• {label}:")),
            Green.paint(n.to_string())
        );
    }

    let range: Option<(String, String)> = pool
        .conn
        .query_row(
            "SELECT MIN(date), MAX(date) FROM work_sessions WHERE date IS NOT NULL HAVING COUNT(*) > 0",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    println!("{}", Cyan.paint("• Date range:"));
    match range {
        Some((first, last)) => {
            println!("    from: {}", first);
            println!("    to:   {}", last);
        }
        None => println!("    --"),
    }

    println!();
    Ok(())
}
