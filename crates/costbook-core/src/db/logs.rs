//! HTTP request log

use rusqlite::params;

use super::{datetime_column, Database};
use crate::error::Result;
use crate::models::{NewRequestLog, RequestLog};

/// Entries returned when no limit is given
pub const DEFAULT_LOG_LIMIT: i64 = 1000;

/// Upper bound on entries returned by one listing
pub const MAX_LOG_LIMIT: i64 = 5000;

/// Clamp a requested listing size to `1..=MAX_LOG_LIMIT`
pub fn clamp_log_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT)
}

impl Database {
    /// Persist one request log entry
    pub fn write_request_log(&self, entry: &NewRequestLog) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO request_logs (method, path, status, duration_ms, endpoint, ip, user_agent)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.method,
                entry.path,
                entry.status,
                entry.duration_ms,
                entry.endpoint,
                entry.ip,
                entry.user_agent,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List request log entries, newest first
    pub fn list_request_logs(&self, limit: Option<i64>) -> Result<Vec<RequestLog>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, method, path, status, duration_ms, endpoint, ip, user_agent, created_at
             FROM request_logs
             ORDER BY id DESC
             LIMIT ?",
        )?;

        let entries = stmt
            .query_map(params![clamp_log_limit(limit)], |row| {
                Ok(RequestLog {
                    id: row.get(0)?,
                    method: row.get(1)?,
                    path: row.get(2)?,
                    status: row.get(3)?,
                    duration_ms: row.get(4)?,
                    endpoint: row.get(5)?,
                    ip: row.get(6)?,
                    user_agent: row.get(7)?,
                    created_at: datetime_column(row, 8)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}
