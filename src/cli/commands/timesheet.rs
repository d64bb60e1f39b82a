use crate::cli::commands::{challenge_rng, deliver, open_with_user, run_gate};
use crate::cli::parser::{Commands, TimesheetAction};
use crate::config::Config;
use crate::core::period::PayPeriod;
use crate::core::timesheet::load_period_groups;
use crate::core::verify::Challenge;
use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::export::naming::timesheet_file_name;
use crate::export::xlsx::render_xlsx;
use crate::export::{ExportedReport, ReportBuilder, ReportKind};
use crate::ui::messages::{error, info};
use crate::utils::date;
use crate::utils::formatting::{bold, hours};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Timesheet { action } = cmd else {
        return Ok(());
    };

    let (mut pool, user) = open_with_user(cfg)?;

    match action {
        TimesheetAction::List { period_offset } => {
            let period = PayPeriod::containing(date::today()).offset(*period_offset);
            let groups = load_period_groups(&pool.conn, cfg, &user, &period)?;

            println!("🗓️  {}", period);
            if groups.is_empty() {
                info("No sessions in this pay period.");
            }
            for g in &groups {
                let card = g.card();
                let days = if card.work_days == 1 { "work day" } else { "work days" };
                println!(
                    "\n{}  {} {}, {} submitted, {}",
                    bold(&card.name),
                    card.work_days,
                    days,
                    card.submitted,
                    hours(card.total_hours)
                );
                for line in card.date_lines {
                    println!("    {line}");
                }
            }
        }

        TimesheetAction::Export {
            period_offset,
            group,
            opts,
        } => {
            let period = PayPeriod::containing(date::today()).offset(*period_offset);
            let groups: Vec<_> = load_period_groups(&pool.conn, cfg, &user, &period)?
                .into_iter()
                .filter(|g| group.as_ref().is_none_or(|wanted| &g.name == wanted))
                .collect();

            if groups.is_empty() {
                return Err(AppError::EmptySelection(format!(
                    "no sessions to report for {period}"
                )));
            }

            let mut rng = challenge_rng(opts.seed);
            let mut failures = 0;

            for g in &groups {
                let challenge = Challenge::generate(&mut rng);
                let title = format!(
                    "PART TIME CASHIER - {}-{} ({})",
                    period.title_month(),
                    period.title_year(),
                    g.name
                );
                let sheet = ReportBuilder::new(ReportKind::Timesheet, title)
                    .sheet_name(&g.name)
                    .signatories(&cfg.timesheet_signatories)
                    .build(&g.report_rows(&user))?;

                let file_name =
                    timesheet_file_name(&user.username, &g.name, &period, challenge.code());
                let report = ExportedReport::xlsx(file_name, render_xlsx(&sheet)?);

                deliver(cfg, opts, &report)?;
                ttlog(
                    &pool.conn,
                    "export",
                    &report.file_name,
                    &format!("Timesheet {} with {} sessions", g.name, g.sessions.len()),
                )?;

                // one group failing the check leaves the others alone
                if let Err(e) = run_gate(
                    &mut pool,
                    &challenge,
                    opts.choice,
                    &g.submit_mutation(),
                    "session(s) marked as submitted.",
                ) {
                    error(format!("{}: {}", g.name, e));
                    failures += 1;
                }
            }

            if failures > 0 {
                return Err(AppError::Other(format!(
                    "{failures} timesheet group(s) were not marked as submitted"
                )));
            }
        }
    }

    Ok(())
}
