//! Cost record operations

use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{datetime_column, format_datetime, format_naive, Database};
use crate::error::{Error, Result};
use crate::models::{Cost, NewCost};
use crate::reports::CostLedger;

const COST_COLUMNS: &str = "id, user_id, description, category, sum, created_at";

fn row_to_cost(row: &rusqlite::Row<'_>) -> rusqlite::Result<Cost> {
    Ok(Cost {
        id: row.get(0)?,
        user_id: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        sum: row.get(4)?,
        created_at: datetime_column(row, 5)?,
    })
}

impl Database {
    /// Record a cost for an existing user
    ///
    /// The timestamp defaults to now. Callers are expected to have validated
    /// the category and amount.
    pub fn add_cost(&self, cost: &NewCost) -> Result<Cost> {
        if !self.user_exists(cost.user_id)? {
            return Err(Error::NotFound(format!("user {}", cost.user_id)));
        }
        if !(cost.sum > 0.0 && cost.sum.is_finite()) {
            return Err(Error::InvalidData(format!(
                "cost amount must be positive, got {}",
                cost.sum
            )));
        }

        let created_at = cost.created_at.unwrap_or_else(Utc::now);

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO costs (user_id, description, category, sum, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                cost.user_id,
                cost.description,
                cost.category,
                cost.sum,
                format_datetime(&created_at),
            ],
        )?;
        let id = conn.last_insert_rowid();

        debug!(cost_id = id, user_id = cost.user_id, category = %cost.category, "Recorded cost");

        self.get_cost(id)?
            .ok_or_else(|| Error::NotFound(format!("cost {}", id)))
    }

    /// Get a cost by id
    pub fn get_cost(&self, id: i64) -> Result<Option<Cost>> {
        let conn = self.conn()?;
        let cost = conn
            .query_row(
                &format!("SELECT {} FROM costs WHERE id = ?", COST_COLUMNS),
                params![id],
                row_to_cost,
            )
            .optional()?;
        Ok(cost)
    }

    /// Costs of a user with `start <= created_at < end`, oldest first
    ///
    /// Ties on the timestamp are broken by insertion order.
    pub fn list_costs_in_range(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Cost>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM costs
             WHERE user_id = ?1 AND created_at >= ?2 AND created_at < ?3
             ORDER BY created_at ASC, id ASC",
            COST_COLUMNS
        ))?;

        let costs = stmt
            .query_map(
                params![user_id, format_naive(&start), format_naive(&end)],
                row_to_cost,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(costs)
    }

    /// Sum of all of a user's costs (0 when there are none)
    pub fn total_for_user(&self, user_id: i64) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(sum), 0.0) FROM costs WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}

impl CostLedger for Database {
    fn costs_in_range(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Cost>> {
        self.list_costs_in_range(user_id, start, end)
    }
}
