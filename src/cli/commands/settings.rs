use crate::cli::commands::open_with_user;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Settings { rate } = cmd {
        let (pool, user) = open_with_user(cfg)?;

        match rate {
            Some(raw) => {
                let saved = user.set_conversion_rate(&pool.conn, raw)?;
                success(format!("Conversion rate for {} set to {}.", user.username, saved));
            }
            None => {
                let current = user.conversion_rate(&pool.conn, cfg.default_conversion_rate)?;
                info(format!("Conversion rate for {}: {}", user.username, current));
            }
        }
    }

    Ok(())
}
