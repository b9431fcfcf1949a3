//! Domain models for costbook

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::period::Period;

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birthday: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user (the id is chosen by the caller)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
}

/// A user together with the sum of all their costs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserWithTotal {
    #[serde(flatten)]
    pub user: User,
    pub total: f64,
}

/// A single expense record. Costs are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub id: i64,
    #[serde(rename = "userid")]
    pub user_id: i64,
    pub description: String,
    pub category: String,
    pub sum: f64,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a cost
#[derive(Debug, Clone)]
pub struct NewCost {
    pub user_id: i64,
    pub description: String,
    pub category: String,
    pub sum: f64,
    /// When the expense happened (defaults to now)
    pub created_at: Option<DateTime<Utc>>,
}

/// One line of a monthly report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    pub sum: f64,
    pub description: String,
    /// Day of month (UTC)
    pub day: u32,
}

/// Items of one category in a monthly report
///
/// Serialized as a single-key object, e.g. `{"food": [...]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCosts {
    pub category: String,
    pub items: Vec<ReportItem>,
}

impl CategoryCosts {
    pub fn new(category: impl Into<String>, items: Vec<ReportItem>) -> Self {
        Self {
            category: category.into(),
            items,
        }
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| i.sum).sum()
    }
}

impl Serialize for CategoryCosts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.category, &self.items)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryCosts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = BTreeMap::<String, Vec<ReportItem>>::deserialize(deserializer)?;
        if map.len() != 1 {
            return Err(D::Error::invalid_length(
                map.len(),
                &"an object with exactly one category",
            ));
        }
        let (category, items) = map
            .into_iter()
            .next()
            .ok_or_else(|| D::Error::custom("empty category object"))?;
        Ok(Self { category, items })
    }
}

/// Category-complete monthly report for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    #[serde(rename = "userid")]
    pub user_id: i64,
    pub year: i32,
    pub month: u32,
    pub costs: Vec<CategoryCosts>,
}

impl MonthlyReport {
    pub fn period(&self) -> Period {
        Period::new(self.year, self.month)
    }

    /// Items for a category, if the category is part of the report
    pub fn category(&self, name: &str) -> Option<&[ReportItem]> {
        self.costs
            .iter()
            .find(|c| c.category == name)
            .map(|c| c.items.as_slice())
    }

    pub fn total(&self) -> f64 {
        self.costs.iter().map(CategoryCosts::total).sum()
    }

    pub fn item_count(&self) -> usize {
        self.costs.iter().map(|c| c.items.len()).sum()
    }
}

/// A materialized report row
#[derive(Debug, Clone, PartialEq)]
pub struct CachedReport {
    pub user_id: i64,
    pub year: i32,
    pub month: u32,
    pub report: MonthlyReport,
    pub generated_at: DateTime<Utc>,
}

/// A persisted HTTP request log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLog {
    pub id: i64,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub duration_ms: i64,
    /// Matched route template, e.g. `/api/users/:id`
    pub endpoint: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for writing a request log entry
#[derive(Debug, Clone, Default)]
pub struct NewRequestLog {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub duration_ms: i64,
    pub endpoint: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> MonthlyReport {
        MonthlyReport {
            user_id: 42,
            year: 2024,
            month: 3,
            costs: vec![
                CategoryCosts::new(
                    "food",
                    vec![ReportItem {
                        sum: 10.5,
                        description: "lunch".into(),
                        day: 3,
                    }],
                ),
                CategoryCosts::new("health", vec![]),
            ],
        }
    }

    #[test]
    fn test_report_wire_shape() {
        let json = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "userid": 42,
                "year": 2024,
                "month": 3,
                "costs": [
                    {"food": [{"sum": 10.5, "description": "lunch", "day": 3}]},
                    {"health": []}
                ]
            })
        );
    }

    #[test]
    fn test_category_costs_rejects_multi_key_objects() {
        let result: std::result::Result<CategoryCosts, _> =
            serde_json::from_str(r#"{"food": [], "health": []}"#);
        assert!(result.is_err());

        let result: std::result::Result<CategoryCosts, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_report_helpers() {
        let report = sample_report();
        assert_eq!(report.period(), Period::new(2024, 3));
        assert_eq!(report.category("food").map(|i| i.len()), Some(1));
        assert_eq!(report.category("health"), Some(&[][..]));
        assert!(report.category("sports").is_none());
        assert_eq!(report.total(), 10.5);
        assert_eq!(report.item_count(), 1);
    }

    #[test]
    fn test_user_with_total_flattens() {
        let user = User {
            id: 1,
            first_name: "Dana".into(),
            last_name: "Levi".into(),
            birthday: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(UserWithTotal { user, total: 12.0 }).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["total"], 12.0);
    }

    #[test]
    fn test_cost_uses_userid_key() {
        let cost = Cost {
            id: 1,
            user_id: 7,
            description: "gym".into(),
            category: "sports".into(),
            sum: 30.0,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(cost).unwrap();
        assert_eq!(json["userid"], 7);
        assert!(json.get("user_id").is_none());
    }
}
