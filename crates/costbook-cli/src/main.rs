//! Costbook CLI - Expense tracker with monthly reports
//!
//! Usage:
//!   costbook init                                     Initialize database
//!   costbook add-user --id 1 --first-name A --last-name B
//!   costbook add-cost -u 1 -d lunch -c food -s 12.5  Record a cost
//!   costbook report -u 1 -y 2024 -m 3                 Monthly report
//!   costbook serve --port 3000                        Start web server

mod cli;
mod commands;


use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use costbook_core::SystemClock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, &config),
        Commands::Users => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_users(&db)
        }
        Commands::AddUser {
            id,
            first_name,
            last_name,
            birthday,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_add_user(&db, id, &first_name, &last_name, birthday.as_deref())
        }
        Commands::AddCost {
            user,
            description,
            category,
            sum,
            at,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_add_cost(
                &db,
                &config.categories,
                &SystemClock,
                user,
                &description,
                &category,
                sum,
                at.as_deref(),
            )
        }
        Commands::Report {
            user,
            year,
            month,
            json,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_report(
                &db,
                &config.categories,
                Arc::new(SystemClock),
                user,
                year,
                month,
                json,
            )
        }
        Commands::Logs { limit } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_logs(&db, limit)
        }
        Commands::Serve { port, host } => commands::cmd_serve(&cli.db, config, &host, port).await,
    }
}
