//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_config` - Resolve categories and team from config files/env
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use costbook_core::{AppConfig, Database};
use tracing::debug;

/// Open (and migrate) the database at `db_path`
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    debug!(path = %path_str, "Opening database");
    Database::new(path_str).context("Failed to open database")
}

/// Load configuration, preferring an explicit `--config` file
pub fn load_config(config_path: Option<&Path>) -> Result<AppConfig> {
    AppConfig::load(config_path).context("Failed to load configuration")
}

pub fn cmd_init(db_path: &Path, config: &AppConfig) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    match &config.source {
        Some(path) => println!("   Config: {}", path.display()),
        None => println!("   Config: built-in defaults"),
    }
    println!("   Categories: {}", config.categories);

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a user: costbook add-user --id 1 --first-name Dana --last-name Levi");
    println!("  2. Start the API: costbook serve");

    Ok(())
}
