pub mod add;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod del;
pub mod fare;
pub mod handoff;
pub mod init;
pub mod list;
pub mod location;
pub mod log;
pub mod settings;
pub mod suggest;
pub mod timesheet;
pub mod user;

use crate::cli::parser::ExportOpts;
use crate::config::Config;
use crate::core::context::UserContext;
use crate::core::verify::{Challenge, GatedMutation, apply_gated};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::{DirectoryShare, ExportedReport, ShareTarget};
use crate::ui::messages::{info, success, warning};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::{self, Write};

/// Open the configured database together with the logged-in employee.
pub(crate) fn open_with_user(cfg: &Config) -> AppResult<(DbPool, UserContext)> {
    let pool = DbPool::new(&cfg.database)?;
    let user = UserContext::require(&pool.conn)?;
    Ok((pool, user))
}

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub(crate) fn challenge_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Hand the report to its destination and tell the user where it went.
pub(crate) fn deliver(cfg: &Config, opts: &ExportOpts, report: &ExportedReport) -> AppResult<()> {
    if opts.base64 {
        info(format!("{} ({})", report.file_name, report.mime_type));
        println!("{}", report.to_base64());
        return Ok(());
    }

    let dir = opts.dir.clone().unwrap_or_else(|| cfg.report_dir.clone());
    DirectoryShare::new(dir, opts.force).share(report)?;
    Ok(())
}

/// Resolve the user's pick: a two-digit code, or the 1-3 position of one.
fn resolve_choice(challenge: &Challenge, raw: u8) -> u8 {
    match raw {
        1..=3 => challenge.option_at(raw as usize).unwrap_or(raw),
        _ => raw,
    }
}

fn prompt_choice(challenge: &Challenge) -> AppResult<u8> {
    let options = challenge.options();
    println!("Use the 2-digit code after the year in the file name to confirm:");
    for (i, code) in options.iter().enumerate() {
        println!("  [{}] {}", i + 1, code);
    }
    print!("Your choice: ");
    io::stdout().flush().ok();

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    line.trim()
        .parse::<u8>()
        .map_err(|_| AppError::VerificationMismatch)
}

/// Show the challenge and apply the mutation on the right answer.
pub(crate) fn run_gate(
    pool: &mut DbPool,
    challenge: &Challenge,
    choice: Option<u8>,
    mutation: &GatedMutation,
    done: &str,
) -> AppResult<()> {
    let raw = match choice {
        Some(c) => c,
        None => prompt_choice(challenge)?,
    };
    let picked = resolve_choice(challenge, raw);

    let n = apply_gated(&mut pool.conn, challenge, picked, mutation)?;
    success(format!("{n} {done}"));
    Ok(())
}
