//! Server command implementation

use std::path::Path;

use anyhow::Result;
use costbook_core::AppConfig;

use super::open_db;

pub async fn cmd_serve(db_path: &Path, config: AppConfig, host: &str, port: u16) -> Result<()> {
    println!("🚀 Starting costbook web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    println!("   Categories: {}", config.categories);
    if !config.allowed_origins.is_empty() {
        println!("   CORS origins: {}", config.allowed_origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;

    costbook_server::serve_with_config(db, host, port, config.into()).await?;

    Ok(())
}
