use crate::cli::commands::open_with_user;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::fare::{load_unified, select_fares};
use crate::core::handoff::payload::QrPayload;
use crate::core::handoff::share::build_share;
use crate::core::handoff::{Handoff, HandoffState, ScanOutcome};
use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::io::{self, BufRead};

/// `share`: print the `fare_share` payload of the selected own fares.
pub fn handle_share(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Share { sessions, out } = cmd {
        let (pool, user) = open_with_user(cfg)?;
        let fares = load_unified(&pool.conn, &user)?;
        let selected = select_fares(&fares, sessions)?;

        let built = build_share(&user, &selected)?;
        if built.skipped > 0 {
            warning(format!(
                "Skipped {} shared card(s): fares received from others cannot be shared again.",
                built.skipped
            ));
        }

        let count = built.payload.sessions.len();
        let json = QrPayload::FareShare(built.payload).to_json()?;

        let mut handoff = Handoff::new();
        handoff.start_share(json.clone())?;

        println!("{json}");
        if let Some(path) = out {
            fs::write(path, &json)?;
            info(format!("Payload written to {path}"));
        }

        ttlog(
            &pool.conn,
            "share",
            &user.emp_id,
            &format!("Shared {count} fare(s)"),
        )?;

        // the sender now waits for the receiver's confirmation
        handoff.close();
        info("Scan the receiver's confirmation with `faresheet scan` to mark these fares as claimed.");
    }

    Ok(())
}

fn read_frames(file: Option<&String>) -> AppResult<Vec<String>> {
    let lines = match file {
        Some(path) => fs::read_to_string(path)?
            .lines()
            .map(str::to_string)
            .collect(),
        None => io::stdin().lock().lines().collect::<Result<Vec<_>, _>>()?,
    };
    Ok(lines.into_iter().filter(|l| !l.trim().is_empty()).collect())
}

/// `scan`: handle payloads one per line until one is acted upon.
pub fn handle_scan(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Scan { file, out } = cmd {
        let (mut pool, user) = open_with_user(cfg)?;
        let frames = read_frames(file.as_ref())?;

        let mut handoff = Handoff::new();
        handoff.start_receive()?;

        for frame in &frames {
            match handoff.on_frame(&mut pool.conn, &user, frame) {
                Ok(ScanOutcome::Received {
                    confirmation,
                    confirmation_json,
                    inserted,
                    already_present,
                }) => {
                    success(format!(
                        "Received {} fare(s) from {} ({} new, {} already stored).",
                        confirmation.received_sessions.len(),
                        confirmation.from_user.username,
                        inserted,
                        already_present
                    ));
                    println!("{confirmation_json}");
                    if let Some(path) = out {
                        fs::write(path, &confirmation_json)?;
                        info(format!("Confirmation written to {path}"));
                    }
                    info("Show this confirmation to the sender.");
                    handoff.close();
                }
                Ok(ScanOutcome::Confirmed { updated, by }) => {
                    success(format!("{updated} fare(s) marked as claimed by {by}."));
                }
                Ok(ScanOutcome::Ignored(reason)) => {
                    info(format!("Frame ignored: {reason}"));
                }
                Err(e @ (AppError::MissingLocations(_) | AppError::Handoff(_))) => return Err(e),
                Err(e) => warning(format!("Unreadable payload: {e}")),
            }

            if *handoff.state() != HandoffState::Receiving {
                break;
            }
        }

        if *handoff.state() == HandoffState::Receiving {
            info("No payload handled.");
        }
    }

    Ok(())
}
