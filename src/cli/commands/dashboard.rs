use crate::cli::commands::open_with_user;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregate::summarize;
use crate::db::sessions::load_located_sessions;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, warning};
use crate::utils::date;
use crate::utils::formatting::{hours, kwd};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Dashboard { today } = cmd {
        let today = match today {
            Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            None => date::today(),
        };

        let (pool, user) = open_with_user(cfg)?;
        let rate = user.conversion_rate(&pool.conn, cfg.default_conversion_rate)?;
        let sessions = load_located_sessions(&pool.conn, &user.emp_id, None)?;
        let s = summarize(&sessions, today, rate);

        header(format!("{} ({})", user.username, user.emp_id));
        println!("📅 Current period  : {}", s.current_period);
        println!("   Hours worked    : {}", hours(s.current_hours));
        println!("   Stores          : {}", s.current_stores);
        println!("   Earnings        : {}", kwd(s.earnings_kwd));
        println!(
            "   Converted       : {:.2} (rate {})",
            s.earnings_converted, s.conversion_rate
        );
        println!("📅 Previous period : {}", s.previous_period);
        println!("   Hours worked    : {}", hours(s.previous_hours));
        println!("🚌 Claimable fare  : {}", kwd(s.claimable_travel_cost));

        if s.has_multiple_sessions_today() {
            warning(format!(
                "Multiple work sessions detected for {} ({} sessions).",
                today, s.sessions_today
            ));
        }
    }

    Ok(())
}
