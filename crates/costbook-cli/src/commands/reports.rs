//! Report command implementations

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Datelike;
use costbook_core::{CategoryRegistry, Clock, Database, MonthlyReport, Period, ReportMaterializer};

/// Render a report as a plain-text table
pub fn format_report(report: &MonthlyReport) -> String {
    let mut out = format!(
        "Report for user {} - {}\n",
        report.user_id,
        report.period()
    );

    for category in &report.costs {
        out.push_str(&format!(
            "\n{} ({:.2})\n",
            category.category,
            category.total()
        ));
        if category.items.is_empty() {
            out.push_str("  -\n");
        }
        for item in &category.items {
            out.push_str(&format!(
                "  {:>2}  {:<40} {:>10.2}\n",
                item.day,
                super::truncate(&item.description, 40),
                item.sum
            ));
        }
    }

    out.push_str(&format!("\nTotal: {:.2}\n", report.total()));
    out
}

pub fn cmd_report(
    db: &Database,
    registry: &CategoryRegistry,
    clock: Arc<dyn Clock>,
    user_id: i64,
    year: Option<i32>,
    month: Option<u32>,
    json: bool,
) -> Result<()> {
    let today = clock.today();
    let period = Period::new(year.unwrap_or(today.year()), month.unwrap_or(today.month()));
    period.ensure_reportable()?;

    if !db.user_exists(user_id)? {
        anyhow::bail!("User {} not found", user_id);
    }

    let materializer = ReportMaterializer::new(
        Arc::new(db.clone()),
        Arc::new(db.clone()),
        registry.clone(),
        clock,
    );
    let materialized = materializer
        .materialize(user_id, period)
        .with_context(|| format!("Failed to build report for {}", period))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&materialized.report)?);
    } else {
        print!("{}", format_report(&materialized.report));
        println!("({})", materialized.source);
    }

    Ok(())
}
