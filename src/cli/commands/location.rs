use crate::cli::parser::{Commands, LocationAction};
use crate::config::Config;
use crate::db::locations::{find_by_code, insert_location, list_locations, set_rate};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;

fn check_rate(rate: f64) -> AppResult<()> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(AppError::InvalidAmount(rate.to_string()));
    }
    Ok(())
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Location { action } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let conn = &pool.conn;

        match action {
            LocationAction::List => {
                println!("{:<6} {:<20} {:>6}", "CODE", "NAME", "RATE");
                for l in list_locations(conn)? {
                    println!(
                        "{:<6} {:<20} {:>6.3}",
                        l.location_code,
                        l.location_name,
                        l.effective_rate()
                    );
                }
            }
            LocationAction::Add { code, name, rate } => {
                if let Some(r) = rate {
                    check_rate(*r)?;
                }
                if find_by_code(conn, code)?.is_some() {
                    return Err(AppError::Other(format!(
                        "Location code {code} already exists."
                    )));
                }
                insert_location(conn, code, name, *rate)?;
                ttlog(conn, "add", code, &format!("Location {name}"))?;
                success(format!("Location {code} ({name}) added."));
            }
            LocationAction::Rate { code, rate } => {
                check_rate(*rate)?;
                if set_rate(conn, code, *rate)? == 0 {
                    return Err(AppError::UnknownLocation(code.clone()));
                }
                ttlog(conn, "edit", code, &format!("Hourly rate set to {rate}"))?;
                success(format!("Hourly rate of {code} set to {rate:.3} KWD."));
            }
        }
    }

    Ok(())
}
