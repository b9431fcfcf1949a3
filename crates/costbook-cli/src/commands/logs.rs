//! Request log command implementation

use anyhow::{Context, Result};
use costbook_core::Database;

use super::truncate;

pub fn cmd_logs(db: &Database, limit: i64) -> Result<()> {
    let entries = db
        .list_request_logs(Some(limit))
        .context("Failed to read request log")?;

    if entries.is_empty() {
        println!("No requests logged yet.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{}  {:<6} {:<40} {:>3}  {:>5}ms",
            entry.created_at.format("%Y-%m-%d %H:%M:%S"),
            entry.method,
            truncate(&entry.path, 40),
            entry.status,
            entry.duration_ms
        );
    }

    Ok(())
}
