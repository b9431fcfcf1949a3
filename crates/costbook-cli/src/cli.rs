//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Costbook - Track costs and get monthly reports per category
#[derive(Parser)]
#[command(name = "costbook")]
#[command(about = "Expense tracker with cached monthly reports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "costbook.db", global = true)]
    pub db: PathBuf,

    /// Config file (defaults to ~/.local/share/costbook/config/costbook.toml)
    #[arg(long, env = "COSTBOOK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// List users with their cost totals
    Users,

    /// Create a user
    AddUser {
        /// User id (must be unused)
        #[arg(long)]
        id: i64,

        /// First name
        #[arg(long)]
        first_name: String,

        /// Last name
        #[arg(long)]
        last_name: String,

        /// Birthday (YYYY-MM-DD)
        #[arg(long)]
        birthday: Option<String>,
    },

    /// Record a cost
    AddCost {
        /// User the cost belongs to
        #[arg(short, long)]
        user: i64,

        /// What the money was spent on
        #[arg(short, long)]
        description: String,

        /// Category (see config for the allowed list)
        #[arg(short, long)]
        category: String,

        /// Amount spent
        #[arg(short, long)]
        sum: f64,

        /// When it happened, RFC 3339 (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Show a monthly report
    Report {
        /// User id
        #[arg(short, long)]
        user: i64,

        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,

        /// Print the raw JSON payload
        #[arg(long)]
        json: bool,
    },

    /// Show recent HTTP request log entries
    Logs {
        /// Maximum number of entries
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}
