//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_db, load_config) and init
//! - `users` - User listing and creation
//! - `costs` - Recording costs
//! - `reports` - Monthly report output
//! - `logs` - Request log listing
//! - `serve` - Web server command

pub mod core;
pub mod costs;
pub mod logs;
pub mod reports;
pub mod serve;
pub mod users;

// Re-export command functions for main.rs
pub use self::core::*;
pub use costs::*;
pub use logs::*;
pub use reports::*;
pub use serve::*;
pub use users::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
