use crate::cli::commands::open_with_user;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::add::{AddLogic, SessionInput, parse_amount};
use crate::errors::{AppError, AppResult};
use crate::utils::date;
use crate::utils::time::parse_optional_clock;

/// Add or update a work session.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        date,
        location,
        tap_in,
        tap_out,
        outbound,
        return_cost,
        edit,
    } = cmd
    {
        let d = match date {
            Some(s) => Some(date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?),
            None => None,
        };

        let input = SessionInput {
            date: d,
            location_code: location.clone(),
            tap_in: parse_optional_clock(tap_in.as_ref())?,
            tap_out: parse_optional_clock(tap_out.as_ref())?,
            outbound_cost: parse_amount(outbound.as_ref())?,
            return_cost: parse_amount(return_cost.as_ref())?,
        };

        let (pool, user) = open_with_user(cfg)?;

        let saved = match edit {
            Some(id) => AddLogic::edit(&pool.conn, &user, id, &input)?,
            None => AddLogic::add(&pool.conn, &user, &input)?,
        };

        if let Some(h) = saved.hours_worked {
            println!("⏱️  Hours worked: {:.2}", h);
        }
        if saved.ticket_fare > 0.0 {
            println!("🚌 Ticket fare: {:.3}", saved.ticket_fare);
        }
    }

    Ok(())
}
