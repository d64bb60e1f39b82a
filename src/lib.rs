//! faresheet library root.
//! Exposes the CLI parser, the high-level run() function and the internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let cmd = &cli.command;
    match cmd {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(cmd, cfg),
        Commands::Db { .. } => commands::db::handle(cmd, cfg),
        Commands::Log { .. } => commands::log::handle(cmd, cfg),
        Commands::User { .. } => commands::user::handle(cmd, cfg),
        Commands::Location { .. } => commands::location::handle(cmd, cfg),
        Commands::Settings { .. } => commands::settings::handle(cmd, cfg),
        Commands::Add { .. } => commands::add::handle(cmd, cfg),
        Commands::Suggest { .. } => commands::suggest::handle(cmd),
        Commands::Dashboard { .. } => commands::dashboard::handle(cmd, cfg),
        Commands::List { .. } => commands::list::handle(cmd, cfg),
        Commands::Fares => commands::list::handle_fares(cfg),
        Commands::Fare { .. } => commands::fare::handle(cmd, cfg),
        Commands::Timesheet { .. } => commands::timesheet::handle(cmd, cfg),
        Commands::Share { .. } => commands::handoff::handle_share(cmd, cfg),
        Commands::Scan { .. } => commands::handoff::handle_scan(cmd, cfg),
        Commands::Del { .. } => commands::del::handle(cmd, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // `init` writes the config itself
    let mut cfg = match cli.command {
        Commands::Init => Config::default(),
        _ => Config::load()?,
    };

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
