//! Costbook Core Library
//!
//! Shared functionality for the costbook expense tracker:
//! - Database access and migrations (users, costs, report cache, request log)
//! - Category registry and configuration loading
//! - Period classification against an injectable clock
//! - Monthly report aggregation and cache materialization

pub mod categories;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod period;
pub mod reports;

pub use categories::{CategoryRegistry, DEFAULT_CATEGORIES};
pub use config::{AppConfig, TeamMember};
pub use db::Database;
pub use error::{Error, Result};
pub use models::*;
pub use period::{Clock, FixedClock, Period, PeriodKind, SystemClock};
pub use reports::{
    CostLedger, Materialized, MonthlyAggregator, ReportCache, ReportMaterializer, ReportSource,
};
