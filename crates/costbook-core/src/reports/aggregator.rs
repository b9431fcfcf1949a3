//! Month aggregation: cost records to a category-complete report

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Datelike;
use tracing::{debug, warn};

use super::CostLedger;
use crate::categories::CategoryRegistry;
use crate::error::Result;
use crate::models::{CategoryCosts, MonthlyReport, ReportItem};
use crate::period::Period;

/// Builds monthly reports from the cost ledger
#[derive(Clone)]
pub struct MonthlyAggregator {
    ledger: Arc<dyn CostLedger>,
    registry: CategoryRegistry,
}

impl MonthlyAggregator {
    pub fn new(ledger: Arc<dyn CostLedger>, registry: CategoryRegistry) -> Self {
        Self { ledger, registry }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Aggregate one user's costs for a month
    ///
    /// Every registry category appears exactly once, in registry order, with
    /// its items in chronological order. Unknown users and empty months yield
    /// an all-empty report.
    pub fn aggregate(&self, user_id: i64, period: Period) -> Result<MonthlyReport> {
        let (start, end) = period.bounds()?;
        let costs = self.ledger.costs_in_range(user_id, start, end)?;

        let mut by_category: HashMap<&str, Vec<ReportItem>> =
            self.registry.iter().map(|name| (name, Vec::new())).collect();

        for cost in &costs {
            match by_category.get_mut(cost.category.as_str()) {
                Some(items) => items.push(ReportItem {
                    sum: cost.sum,
                    description: cost.description.clone(),
                    day: cost.created_at.day(),
                }),
                None => warn!(
                    cost_id = cost.id,
                    category = %cost.category,
                    "Skipping cost with unregistered category"
                ),
            }
        }

        let report = MonthlyReport {
            user_id,
            year: period.year,
            month: period.month,
            costs: self
                .registry
                .iter()
                .map(|name| {
                    CategoryCosts::new(name, by_category.remove(name).unwrap_or_default())
                })
                .collect(),
        };

        debug!(user_id, %period, items = report.item_count(), "Aggregated monthly report");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::error::Error;
    use crate::models::{NewCost, NewUser};
    use chrono::{NaiveDateTime, TimeZone, Utc};

    fn setup_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.create_user(&NewUser {
            id: 42,
            first_name: "Dana".into(),
            last_name: "Levi".into(),
            birthday: None,
        })
        .unwrap();
        db
    }

    fn add(db: &Database, category: &str, sum: f64, desc: &str, ts: (i32, u32, u32, u32)) {
        db.add_cost(&NewCost {
            user_id: 42,
            description: desc.into(),
            category: category.into(),
            sum,
            created_at: Some(Utc.with_ymd_and_hms(ts.0, ts.1, ts.2, ts.3, 0, 0).unwrap()),
        })
        .unwrap();
    }

    fn categories(report: &MonthlyReport) -> Vec<&str> {
        report.costs.iter().map(|c| c.category.as_str()).collect()
    }

    #[test]
    fn test_empty_month_is_category_complete() {
        let db = setup_db();
        let aggregator = MonthlyAggregator::new(Arc::new(db), CategoryRegistry::default());

        let report = aggregator.aggregate(42, Period::new(2024, 1)).unwrap();
        assert_eq!(
            categories(&report),
            vec!["food", "health", "housing", "sports", "education"]
        );
        assert!(report.costs.iter().all(|c| c.items.is_empty()));
        assert_eq!(report.user_id, 42);
        assert_eq!((report.year, report.month), (2024, 1));
    }

    #[test]
    fn test_unknown_user_yields_empty_report() {
        let db = setup_db();
        let aggregator = MonthlyAggregator::new(Arc::new(db), CategoryRegistry::default());

        let report = aggregator.aggregate(999, Period::new(2024, 3)).unwrap();
        assert_eq!(report.costs.len(), 5);
        assert_eq!(report.item_count(), 0);
    }

    #[test]
    fn test_alternate_registry_order() {
        let db = setup_db();
        add(&db, "food", 5.0, "bread", (2024, 3, 2, 8));
        let registry = CategoryRegistry::new(["sports", "food"]).unwrap();
        let aggregator = MonthlyAggregator::new(Arc::new(db), registry);

        let report = aggregator.aggregate(42, Period::new(2024, 3)).unwrap();
        assert_eq!(categories(&report), vec!["sports", "food"]);
        assert_eq!(report.category("food").map(|i| i.len()), Some(1));
    }

    #[test]
    fn test_unregistered_category_is_dropped() {
        let db = setup_db();
        add(&db, "food", 5.0, "bread", (2024, 3, 2, 8));
        add(&db, "housing", 900.0, "rent", (2024, 3, 1, 9));
        // Registry shrank after the housing cost was recorded
        let registry = CategoryRegistry::new(["food"]).unwrap();
        let aggregator = MonthlyAggregator::new(Arc::new(db), registry);

        let report = aggregator.aggregate(42, Period::new(2024, 3)).unwrap();
        assert_eq!(categories(&report), vec!["food"]);
        assert_eq!(report.item_count(), 1);
    }

    #[test]
    fn test_items_are_chronological_with_insertion_tiebreak() {
        let db = setup_db();
        add(&db, "food", 3.0, "late", (2024, 3, 20, 12));
        add(&db, "food", 1.0, "early", (2024, 3, 5, 12));
        add(&db, "food", 2.0, "tie-first", (2024, 3, 10, 12));
        add(&db, "food", 4.0, "tie-second", (2024, 3, 10, 12));
        let aggregator = MonthlyAggregator::new(Arc::new(db), CategoryRegistry::default());

        let report = aggregator.aggregate(42, Period::new(2024, 3)).unwrap();
        let descriptions: Vec<&str> = report
            .category("food")
            .unwrap()
            .iter()
            .map(|i| i.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["early", "tie-first", "tie-second", "late"]);
    }

    #[test]
    fn test_month_window_boundaries() {
        let db = setup_db();
        db.add_cost(&NewCost {
            user_id: 42,
            description: "last of feb".into(),
            category: "food".into(),
            sum: 1.0,
            created_at: Some(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()),
        })
        .unwrap();
        db.add_cost(&NewCost {
            user_id: 42,
            description: "first of march".into(),
            category: "food".into(),
            sum: 2.0,
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
        })
        .unwrap();
        db.add_cost(&NewCost {
            user_id: 42,
            description: "first of april".into(),
            category: "food".into(),
            sum: 3.0,
            created_at: Some(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()),
        })
        .unwrap();
        let aggregator = MonthlyAggregator::new(Arc::new(db), CategoryRegistry::default());

        let march = aggregator.aggregate(42, Period::new(2024, 3)).unwrap();
        let items = march.category("food").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "first of march");
        assert_eq!(items[0].day, 1);

        let feb = aggregator.aggregate(42, Period::new(2024, 2)).unwrap();
        assert_eq!(feb.category("food").unwrap()[0].day, 29);
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        let db = setup_db();
        let aggregator = MonthlyAggregator::new(Arc::new(db), CategoryRegistry::default());
        assert!(matches!(
            aggregator.aggregate(42, Period::new(2024, 13)),
            Err(Error::InvalidPeriod { .. })
        ));
    }

    struct BrokenLedger;

    impl CostLedger for BrokenLedger {
        fn costs_in_range(
            &self,
            _user_id: i64,
            _start: NaiveDateTime,
            _end: NaiveDateTime,
        ) -> Result<Vec<crate::models::Cost>> {
            Err(Error::InvalidData("ledger offline".into()))
        }
    }

    #[test]
    fn test_ledger_failure_propagates() {
        let aggregator = MonthlyAggregator::new(Arc::new(BrokenLedger), CategoryRegistry::default());
        let err = aggregator.aggregate(1, Period::new(2024, 3)).unwrap_err();
        assert!(err.to_string().contains("ledger offline"));
    }
}
