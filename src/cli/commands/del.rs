use crate::cli::commands::{ask_confirmation, open_with_user};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::del::DeleteLogic;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del {
        shared,
        session,
        yes,
    } = cmd
    {
        let (pool, user) = open_with_user(cfg)?;

        if let Some(id) = shared {
            let fare = DeleteLogic::find_shared(&pool.conn, &user, *id)?;
            let prompt = format!(
                "Delete fare #{} of {} received from {}? This action is irreversible.",
                fare.id,
                fare.date.format("%Y-%m-%d"),
                fare.shared_from_emp
            );
            if !*yes && !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return Ok(());
            }

            DeleteLogic::delete_shared(&pool.conn, &fare)?;
            success(format!("Received fare #{} has been deleted.", fare.id));
            return Ok(());
        }

        let Some(session_id) = session else {
            return Err(AppError::EmptySelection(
                "use --shared <ID> or --session <SESSION_ID>".into(),
            ));
        };

        let ws = DeleteLogic::find_session(&pool.conn, &user, session_id)?;
        let prompt = format!(
            "Delete session {} of {}? This action is irreversible.",
            ws.session_id,
            ws.date_str()
        );
        if !*yes && !ask_confirmation(&prompt) {
            info("Operation cancelled.");
            return Ok(());
        }

        DeleteLogic::delete_session(&pool.conn, &ws)?;
        success(format!("Session {} has been deleted.", ws.session_id));
    }

    Ok(())
}
