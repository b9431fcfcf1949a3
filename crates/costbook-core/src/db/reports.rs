//! Materialized monthly report cache

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::{datetime_column, format_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{CachedReport, MonthlyReport};
use crate::period::Period;
use crate::reports::ReportCache;

impl Database {
    /// Look up the cached report for (user, period)
    pub fn get_cached_report(&self, user_id: i64, period: Period) -> Result<Option<CachedReport>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT payload, generated_at FROM monthly_reports
                 WHERE user_id = ?1 AND year = ?2 AND month = ?3",
                params![user_id, period.year, period.month],
                |row| Ok((row.get::<_, String>(0)?, datetime_column(row, 1)?)),
            )
            .optional()?;

        let Some((payload, generated_at)) = row else {
            return Ok(None);
        };

        let report: MonthlyReport = serde_json::from_str(&payload)?;
        if report.user_id != user_id || report.period() != period {
            return Err(Error::InvalidData(format!(
                "cached payload for user {} {} describes user {} {}",
                user_id,
                period,
                report.user_id,
                report.period()
            )));
        }

        Ok(Some(CachedReport {
            user_id,
            year: period.year,
            month: period.month,
            report,
            generated_at,
        }))
    }

    /// Insert or fully replace the cached report for the payload's (user, period)
    ///
    /// Single statement, so concurrent writers of the same key converge on
    /// one row without a duplicate-key error.
    pub fn upsert_cached_report(&self, report: &MonthlyReport) -> Result<()> {
        let payload = serde_json::to_string(report)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO monthly_reports (user_id, year, month, payload, generated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id, year, month) DO UPDATE SET
                payload = excluded.payload,
                generated_at = excluded.generated_at",
            params![
                report.user_id,
                report.year,
                report.month,
                payload,
                format_datetime(&Utc::now()),
            ],
        )?;
        Ok(())
    }

    /// Number of cached reports stored for a user
    pub fn count_cached_reports(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM monthly_reports WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl ReportCache for Database {
    fn load(&self, user_id: i64, period: Period) -> Result<Option<MonthlyReport>> {
        Ok(self.get_cached_report(user_id, period)?.map(|c| c.report))
    }

    fn store(&self, report: &MonthlyReport) -> Result<()> {
        self.upsert_cached_report(report)
    }
}
