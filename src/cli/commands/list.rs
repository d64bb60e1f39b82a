use crate::cli::commands::open_with_user;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregate::{duplicate_days, group_by_period, total_hours};
use crate::core::fare::{group_by_month, load_unified};
use crate::core::period::PayPeriod;
use crate::db::pool::DbPool;
use crate::db::sessions::{load_all_sessions, load_located_sessions};
use crate::errors::AppResult;
use crate::models::work_session::LocatedSession;
use crate::ui::messages::{info, warning};
use crate::utils::date;
use crate::utils::formatting::{bold, hours};

fn flag(b: bool) -> &'static str {
    if b { "✔" } else { "·" }
}

fn print_session(s: &LocatedSession) {
    let w = &s.session;
    println!(
        "  {} {}  {:<16} {:>9} → {:<9} {:>5}  fare {:>6.3}  claimed {}  submitted {}",
        w.session_id,
        w.date_str(),
        format!("{} {}", s.location_code, s.location_name),
        w.tap_in.as_deref().unwrap_or("--"),
        w.tap_out.as_deref().unwrap_or("--"),
        w.hours_worked.map(|h| format!("{h:.1}")).unwrap_or_else(|| "--".into()),
        w.travel_cost(),
        flag(w.ticket_fare_claimed),
        flag(w.timesheet_submitted),
    );
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { period_offset, all } = cmd {
        if *all {
            let pool = DbPool::new(&cfg.database)?;
            let sessions = load_all_sessions(&pool.conn)?;
            if sessions.is_empty() {
                info("No sessions recorded.");
            }
            for w in sessions {
                println!(
                    "  {} {} emp {:<8} hours {:>5}  fare {:>6.3}",
                    w.session_id,
                    w.date_str(),
                    w.emp_id,
                    w.hours_worked.map(|h| format!("{h:.1}")).unwrap_or_else(|| "--".into()),
                    w.travel_cost()
                );
            }
            return Ok(());
        }

        let (pool, user) = open_with_user(cfg)?;
        let range = period_offset.map(|n| {
            let p = PayPeriod::containing(date::today()).offset(n);
            (p.start, p.end)
        });
        let sessions = load_located_sessions(&pool.conn, &user.emp_id, range)?;

        if sessions.is_empty() {
            info("No sessions for this selection.");
            return Ok(());
        }

        for (period, list) in group_by_period(&sessions) {
            println!(
                "\n{}  ({} sessions, {})",
                bold(&period.key()),
                list.len(),
                hours(total_hours(list.iter().copied()))
            );
            for s in list {
                print_session(s);
            }
        }

        for d in duplicate_days(&sessions) {
            warning(format!("Multiple work sessions detected for {}.", d));
        }
    }

    Ok(())
}

/// `fares`: own and received fares by month.
pub fn handle_fares(cfg: &Config) -> AppResult<()> {
    let (pool, user) = open_with_user(cfg)?;
    let fares = load_unified(&pool.conn, &user)?;

    if fares.is_empty() {
        info("No fares recorded.");
        return Ok(());
    }

    for (month, list) in group_by_month(&fares) {
        let total: f64 = list.iter().map(|f| f.total_fare()).sum();
        println!("\n{}  ({:.3} KWD)", bold(&month), total);
        for f in list {
            let loc = f
                .location_name
                .clone()
                .or_else(|| f.location_code.clone())
                .unwrap_or_else(|| "Unknown".into());
            let from = f
                .shared_from_emp
                .as_deref()
                .map(|n| format!(" from {n}"))
                .unwrap_or_default();
            let id = f
                .shared_row_id
                .map(|i| format!(" #{i}"))
                .unwrap_or_default();
            println!(
                "  {} {}  {:<16} {:>6.3}  claimed {} {}{}{}",
                f.session_id,
                f.date.format("%Y-%m-%d"),
                loc,
                f.total_fare(),
                flag(f.ticket_fare_claimed),
                f.source.badge(),
                id,
                from
            );
        }
    }

    Ok(())
}
