//! Cost command implementations

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use costbook_core::{CategoryRegistry, Clock, Database, Error, NewCost, Period, PeriodKind};

#[allow(clippy::too_many_arguments)]
pub fn cmd_add_cost(
    db: &Database,
    registry: &CategoryRegistry,
    clock: &dyn Clock,
    user_id: i64,
    description: &str,
    category: &str,
    sum: f64,
    at: Option<&str>,
) -> Result<()> {
    let description = description.trim();
    if description.is_empty() {
        bail!("Description must not be empty");
    }

    let Some(category) = registry.normalize(category.trim()) else {
        bail!("Unknown category '{}' (expected one of: {})", category, registry);
    };

    if !(sum > 0.0 && sum.is_finite()) {
        bail!("Sum must be a positive number");
    }

    let created_at = at
        .map(|s| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)))
        .transpose()
        .context("Invalid --at timestamp (use RFC 3339, e.g. 2024-03-01T12:00:00Z)")?;

    if let Some(ts) = created_at {
        if Period::containing(ts.date_naive()).classify(clock.today()) == PeriodKind::Past {
            bail!("Cannot record a cost in a past month ({})", ts.format("%Y-%m"));
        }
    }

    let cost = match db.add_cost(&NewCost {
        user_id,
        description: description.to_string(),
        category: category.to_string(),
        sum,
        created_at,
    }) {
        Ok(cost) => cost,
        Err(Error::NotFound(_)) => bail!("User {} not found", user_id),
        Err(e) => return Err(e).context("Failed to record cost"),
    };

    println!(
        "✅ Recorded {:.2} for {} ({}) on {}",
        cost.sum,
        cost.description,
        cost.category,
        cost.created_at.format("%Y-%m-%d")
    );
    Ok(())
}
