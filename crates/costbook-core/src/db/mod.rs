//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `users` - User directory
//! - `costs` - Append-only cost records and the month range scan
//! - `reports` - Materialized monthly report cache
//! - `logs` - HTTP request log

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::debug;

use crate::error::Result;

mod costs;
mod logs;
mod reports;
mod users;

pub use logs::{clamp_log_limit, DEFAULT_LOG_LIMIT, MAX_LOG_LIMIT};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Timestamp storage format. Fixed width, so text order is time order.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Format a UTC timestamp for storage
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.naive_utc().format(DATETIME_FORMAT).to_string()
}

/// Format a naive (UTC) timestamp for storage or range bounds
pub(crate) fn format_naive(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Parse a stored timestamp. Fractional seconds are optional.
pub(crate) fn parse_datetime(s: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").map(|dt| dt.and_utc())
}

/// Read a timestamp column, surfacing bad text as a conversion error
pub(crate) fn datetime_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    parse_datetime(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) a database file and run migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            // Concurrent writers wait for each other instead of failing with SQLITE_BUSY
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")
        });

        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` so every pooled
    /// connection sees the same data.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "costbook_test_{}_{}.db",
            std::process::id(),
            id
        ));
        let path = path.to_string_lossy().into_owned();

        // Remove leftovers from an earlier run
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path, suffix));
        }

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Users (ids are chosen by the caller)
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                birthday TEXT,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
            );

            -- Costs (append-only; id is insertion order)
            CREATE TABLE IF NOT EXISTS costs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                sum REAL NOT NULL CHECK (sum > 0),
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_costs_user_created
                ON costs(user_id, created_at, id);

            -- Materialized monthly reports (past and future periods only)
            CREATE TABLE IF NOT EXISTS monthly_reports (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                year INTEGER NOT NULL,
                month INTEGER NOT NULL,
                payload TEXT NOT NULL,
                generated_at TEXT NOT NULL,
                UNIQUE(user_id, year, month)
            );

            -- HTTP request log
            CREATE TABLE IF NOT EXISTS request_logs (
                id INTEGER PRIMARY KEY,
                method TEXT NOT NULL,
                path TEXT NOT NULL,
                status INTEGER NOT NULL,
                duration_ms INTEGER NOT NULL,
                endpoint TEXT,
                ip TEXT,
                user_agent TEXT,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
            );

            CREATE INDEX IF NOT EXISTS idx_request_logs_created
                ON request_logs(created_at);
            "#,
        )?;

        debug!(path = %self.db_path, "Database migrations complete");
        Ok(())
    }
}
