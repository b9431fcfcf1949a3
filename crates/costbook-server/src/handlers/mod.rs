//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod about;
pub mod add;
pub mod logs;
pub mod reports;
pub mod users;

// Re-export all handlers for use in router
pub use about::*;
pub use add::*;
pub use logs::*;
pub use reports::*;
pub use users::*;
