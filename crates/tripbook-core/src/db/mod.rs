//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `vehicles` - Vehicle enrollment and baselines
//! - `mileage` - Mileage log entry CRUD (absolute readings only)
//! - `settings` - Per-user settings such as the logging style
//!
//! [`Database`] implements [`MileageStore`], so the service layer can run
//! against it directly.

use chrono::{DateTime, NaiveDate, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;
use crate::models::{LoggingStyle, MileageLogEntry, NewMileageLogEntry, Vehicle};
use crate::store::MileageStore;

mod mileage;
mod settings;
mod vehicles;


pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a stored `YYYY-MM-DD` date column
pub(crate) fn parse_date(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
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
        // Foreign keys are per-connection, so enable them on every pooled one
        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Create an in-memory database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because every pooled
    /// connection to `:memory:` would see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "tripbook_test_{}_{}.db",
            std::process::id(),
            id
        ));

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path.to_string_lossy())
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

            -- Synchronous NORMAL: good balance of safety and performance
            PRAGMA synchronous = NORMAL;

            -- Vehicles (baseline odometer recorded at enrollment)
            CREATE TABLE IF NOT EXISTS vehicles (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                baseline_odometer REAL NOT NULL DEFAULT 0,
                archived BOOLEAN DEFAULT FALSE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Mileage logs (always absolute readings, whatever the input style)
            CREATE TABLE IF NOT EXISTS mileage_logs (
                id INTEGER PRIMARY KEY,
                vehicle_id INTEGER NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
                date DATE NOT NULL,
                odometer REAL NOT NULL,
                description TEXT,
                is_business_use BOOLEAN NOT NULL DEFAULT TRUE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_mileage_logs_vehicle ON mileage_logs(vehicle_id);

            -- Key/value user settings
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )?;

        info!(path = %self.db_path, "Database migrations complete");
        Ok(())
    }
}

impl MileageStore for Database {
    fn get_vehicle(&self, id: i64) -> Result<Option<Vehicle>> {
        Database::get_vehicle(self, id)
    }

    fn list_mileage_entries(&self, vehicle_id: i64) -> Result<Vec<MileageLogEntry>> {
        self.get_mileage_logs(vehicle_id)
    }

    fn get_mileage_entry(&self, id: i64) -> Result<Option<MileageLogEntry>> {
        self.get_mileage_log(id)
    }

    fn create_mileage_entry(&self, entry: &NewMileageLogEntry) -> Result<i64> {
        self.create_mileage_log(entry)
    }

    fn update_mileage_entry(&self, entry: &MileageLogEntry) -> Result<()> {
        self.update_mileage_log(entry)
    }

    fn delete_mileage_entry(&self, id: i64) -> Result<()> {
        self.delete_mileage_log(id)
    }

    fn logging_style(&self) -> Result<Option<LoggingStyle>> {
        self.get_logging_style()
    }
}
