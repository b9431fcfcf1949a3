//! Cache policy for monthly reports
//!
//! | period      | cache probe | action                  | cache write |
//! |-------------|-------------|-------------------------|-------------|
//! | current     | skipped     | aggregate (live)        | never       |
//! | past/future | miss        | aggregate (computed)    | upsert      |
//! | past/future | hit         | return cached payload   | none        |
//!
//! A cached payload whose category list no longer matches the registry is
//! treated as a miss and overwritten.
//!
//! There is no lock around probe, aggregate and store. Two first requests for
//! the same key may both compute; the upsert leaves a single row either way.

use std::sync::Arc;

use tracing::{debug, info};

use super::{CostLedger, Materialized, MonthlyAggregator, ReportCache, ReportSource};
use crate::categories::CategoryRegistry;
use crate::error::Result;
use crate::models::MonthlyReport;
use crate::period::{Clock, Period, PeriodKind};

/// Serves monthly reports, computing or caching them as the period requires
#[derive(Clone)]
pub struct ReportMaterializer {
    aggregator: MonthlyAggregator,
    cache: Arc<dyn ReportCache>,
    clock: Arc<dyn Clock>,
}

impl ReportMaterializer {
    pub fn new(
        ledger: Arc<dyn CostLedger>,
        cache: Arc<dyn ReportCache>,
        registry: CategoryRegistry,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            aggregator: MonthlyAggregator::new(ledger, registry),
            cache,
            clock,
        }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        self.aggregator.registry()
    }

    /// Classify a period against this materializer's clock
    pub fn classify(&self, period: Period) -> PeriodKind {
        period.classify(self.clock.today())
    }

    /// Produce the report for (user, period) and say how it was obtained
    ///
    /// Errors from the ledger, the cache probe and the cache write are all
    /// returned unchanged.
    pub fn materialize(&self, user_id: i64, period: Period) -> Result<Materialized> {
        let kind = self.classify(period);

        if kind == PeriodKind::Current {
            let report = self.aggregator.aggregate(user_id, period)?;
            debug!(user_id, %period, "Serving live report for current month");
            return Ok(Materialized {
                source: ReportSource::Live,
                report,
            });
        }

        if let Some(report) = self.cache.load(user_id, period)? {
            let categories = report.costs.iter().map(|c| c.category.as_str());
            if self.registry().matches(categories) {
                debug!(user_id, %period, %kind, "Report cache hit");
                return Ok(Materialized {
                    source: ReportSource::Cached,
                    report,
                });
            }
            info!(user_id, %period, "Cached report predates category change, rebuilding");
        }

        let report = self.aggregator.aggregate(user_id, period)?;
        self.cache.store(&report)?;
        info!(user_id, %period, %kind, "Materialized monthly report");

        Ok(Materialized {
            source: ReportSource::Computed,
            report,
        })
    }

    /// Produce the report for (user, period)
    pub fn get_report(&self, user_id: i64, period: Period) -> Result<MonthlyReport> {
        Ok(self.materialize(user_id, period)?.report)
    }
}
