//! Integration tests for costbook-core
//!
//! These tests exercise the config → record → report workflow through the
//! public API only.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use costbook_core::{
    AppConfig, Database, FixedClock, NewCost, NewUser, Period, ReportMaterializer, ReportSource,
};

fn materializer(db: &Database, config: &AppConfig, today: NaiveDate) -> ReportMaterializer {
    ReportMaterializer::new(
        Arc::new(db.clone()),
        Arc::new(db.clone()),
        config.categories.clone(),
        Arc::new(FixedClock(today)),
    )
}

fn record(db: &Database, user_id: i64, category: &str, sum: f64, day: u32, month: u32) {
    db.add_cost(&NewCost {
        user_id,
        description: format!("{} on {}", category, day),
        category: category.into(),
        sum,
        created_at: Some(Utc.with_ymd_and_hms(2024, month, day, 18, 0, 0).unwrap()),
    })
    .expect("Failed to record cost");
}

// =============================================================================
// Workflow Tests
// =============================================================================

#[test]
fn test_month_rollover_workflow() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("costbook.db");
    let path = path.to_str().unwrap();

    let config = AppConfig::parse(
        r#"
        [categories]
        names = ["rent", "food"]
        "#,
    )
    .unwrap();

    let db = Database::new(path).expect("Failed to open database");
    db.create_user(&NewUser {
        id: 1,
        first_name: "Dana".into(),
        last_name: "Levi".into(),
        birthday: None,
    })
    .unwrap();

    record(&db, 1, "food", 20.0, 3, 4);
    record(&db, 1, "rent", 900.0, 1, 4);

    // During April the report is live and nothing is stored
    let april = Period::new(2024, 4);
    let in_april = materializer(&db, &config, NaiveDate::from_ymd_opt(2024, 4, 20).unwrap());
    let live = in_april.materialize(1, april).unwrap();
    assert_eq!(live.source, ReportSource::Live);
    assert_eq!(db.count_cached_reports(1).unwrap(), 0);

    let categories: Vec<&str> = live.report.costs.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(categories, vec!["rent", "food"]);

    // Once May starts, April is materialized on first read
    let in_may = materializer(&db, &config, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
    let computed = in_may.materialize(1, april).unwrap();
    assert_eq!(computed.source, ReportSource::Computed);
    assert_eq!(computed.report, live.report);

    // The cache survives reopening the database
    drop(in_may);
    drop(in_april);
    drop(db);

    let reopened = Database::new(path).unwrap();
    let later = materializer(&reopened, &config, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    let cached = later.materialize(1, april).unwrap();
    assert_eq!(cached.source, ReportSource::Cached);
    assert_eq!(cached.report, live.report);
    assert_eq!(cached.report.total(), 920.0);
}

#[test]
fn test_users_are_isolated() {
    let db = Database::in_memory().unwrap();
    let config = AppConfig::default();

    for id in [1, 2] {
        db.create_user(&NewUser {
            id,
            first_name: format!("User{}", id),
            last_name: "Test".into(),
            birthday: None,
        })
        .unwrap();
    }
    record(&db, 1, "food", 5.0, 10, 1);
    record(&db, 2, "sports", 50.0, 11, 1);

    let m = materializer(&db, &config, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    let first = m.get_report(1, Period::new(2024, 1)).unwrap();
    let second = m.get_report(2, Period::new(2024, 1)).unwrap();

    assert_eq!(first.item_count(), 1);
    assert_eq!(first.category("food").map(|i| i.len()), Some(1));
    assert_eq!(second.item_count(), 1);
    assert_eq!(second.category("sports").map(|i| i.len()), Some(1));
    assert_eq!(db.count_cached_reports(1).unwrap(), 1);
    assert_eq!(db.count_cached_reports(2).unwrap(), 1);
}
