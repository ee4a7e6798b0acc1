//! User settings

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::{Error, Result};
use crate::models::LoggingStyle;

const LOGGING_STYLE_KEY: &str = "logging_style";

impl Database {
    /// Get a raw setting value
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT value FROM settings WHERE key = ?",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(Into::into)
    }

    /// Insert or replace a setting value
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            updated_at = CURRENT_TIMESTAMP",
            params![key, value],
        )?;
        Ok(())
    }

    /// The saved logging style, if any
    pub fn get_logging_style(&self) -> Result<Option<LoggingStyle>> {
        self.get_setting(LOGGING_STYLE_KEY)?
            .map(|s| {
                s.parse()
                    .map_err(|e: String| Error::Store(format!("Corrupt setting: {}", e)))
            })
            .transpose()
    }

    /// Save the logging style
    pub fn set_logging_style(&self, style: LoggingStyle) -> Result<()> {
        self.set_setting(LOGGING_STYLE_KEY, style.as_str())
    }
}
