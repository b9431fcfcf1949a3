//! Monthly report materialization
//!
//! Reports are built from the cost ledger and, for periods other than the
//! current month, stored in a cache keyed by (user, year, month):
//! - `aggregator` - scans one month of costs into a category-complete report
//! - `materializer` - decides between live computation and the cache
//!
//! Storage is reached through the [`CostLedger`] and [`ReportCache`] traits;
//! [`crate::db::Database`] implements both.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::Result;
use crate::models::{Cost, MonthlyReport};
use crate::period::Period;

mod aggregator;
mod materializer;

pub use aggregator::MonthlyAggregator;
pub use materializer::ReportMaterializer;

/// Read access to cost records
pub trait CostLedger: Send + Sync {
    /// Costs of `user_id` with `start <= created_at < end`, ordered by
    /// (created_at, insertion order) ascending
    fn costs_in_range(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Cost>>;
}

/// Keyed store of materialized reports
pub trait ReportCache: Send + Sync {
    fn load(&self, user_id: i64, period: Period) -> Result<Option<MonthlyReport>>;

    /// Insert or replace the entry for the report's (user, year, month)
    fn store(&self, report: &MonthlyReport) -> Result<()>;
}

/// How a report was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSource {
    /// Current month, computed and not stored
    Live,
    /// Served from the cache
    Cached,
    /// Cache miss, computed and stored
    Computed,
}

impl ReportSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Cached => "cached",
            Self::Computed => "computed",
        }
    }
}

impl std::fmt::Display for ReportSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A report together with how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct Materialized {
    pub source: ReportSource,
    pub report: MonthlyReport,
}
