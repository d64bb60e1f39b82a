use crate::cli::commands::{challenge_rng, deliver, open_with_user, run_gate};
use crate::cli::parser::{Commands, FareAction};
use crate::config::Config;
use crate::core::fare::{claim_mutation, fare_report_rows, load_unified, select_fares};
use crate::core::period::PayPeriod;
use crate::core::verify::Challenge;
use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::export::naming::fare_file_name;
use crate::export::xlsx::render_xlsx;
use crate::export::{ExportedReport, ReportBuilder, ReportKind};
use crate::ui::messages::warning;
use crate::utils::date::{self, month_abbrev_upper};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Fare {
        action: FareAction::Export { sessions, opts },
    } = cmd
    {
        let (mut pool, user) = open_with_user(cfg)?;

        let fares = load_unified(&pool.conn, &user)?;
        let selected = select_fares(&fares, sessions)?;
        let already = selected.iter().filter(|f| f.ticket_fare_claimed).count();
        if already > 0 {
            warning(format!("{already} selected fare(s) are already claimed."));
        }

        let rows = fare_report_rows(&pool.conn, &user, &selected)?;
        let period = PayPeriod::containing(date::today());
        let challenge = Challenge::generate(&mut challenge_rng(opts.seed));

        let title = format!(
            "PART TIME CASHIER BUS FARE - {} - {}",
            month_abbrev_upper(period.end),
            period.title_year()
        );
        let sheet = ReportBuilder::new(ReportKind::Fare, title)
            .signatories(&cfg.fare_signatories)
            .build(&rows)?;

        let names: Vec<String> = rows.iter().map(|r| r.name.clone()).collect();
        let file_name = fare_file_name(&names, &period, challenge.code());
        let report = ExportedReport::xlsx(file_name, render_xlsx(&sheet)?);

        deliver(cfg, opts, &report)?;
        ttlog(
            &pool.conn,
            "export",
            &report.file_name,
            &format!("Fare report with {} fares", selected.len()),
        )?;

        run_gate(
            &mut pool,
            &challenge,
            opts.choice,
            &claim_mutation(&user, &selected),
            "fare(s) marked as claimed.",
        )?;
    }

    Ok(())
}
