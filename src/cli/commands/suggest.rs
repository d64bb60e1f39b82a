use crate::cli::parser::Commands;
use crate::core::calculator::suggest::suggest_tap_out_times;
use crate::errors::{AppError, AppResult};
use crate::utils::date;
use crate::utils::time::{format_12h, parse_clock};

pub fn handle(cmd: &Commands) -> AppResult<()> {
    if let Commands::Suggest { tap_in, date: d } = cmd {
        let t = parse_clock(tap_in).ok_or_else(|| AppError::InvalidTime(tap_in.clone()))?;
        let day = match d {
            Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            None => date::today(),
        };

        let suggestions = suggest_tap_out_times(day.and_time(t));
        if suggestions.is_empty() {
            println!("No tap-out suggestion between 8 AM and midnight.");
            return Ok(());
        }

        println!("Tap-in {}, suggested tap-out:", format_12h(t));
        for s in suggestions {
            println!("  {:>5.1} hrs → {}", s.hours_worked, format_12h(s.time.time()));
        }
    }

    Ok(())
}
