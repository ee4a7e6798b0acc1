//! Mileage log operations
//!
//! Rows always hold the resolved absolute reading. Nothing here knows about
//! logging styles or distances.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{MileageLogEntry, NewMileageLogEntry};

const MILEAGE_COLUMNS: &str =
    "id, vehicle_id, date, odometer, description, is_business_use, created_at";

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<MileageLogEntry> {
    let date_str: String = row.get(2)?;
    let created_at_str: String = row.get(6)?;
    Ok(MileageLogEntry {
        id: row.get(0)?,
        vehicle_id: row.get(1)?,
        date: parse_date(2, &date_str)?,
        odometer: row.get(3)?,
        description: row.get(4)?,
        is_business_use: row.get(5)?,
        created_at: parse_datetime(&created_at_str),
    })
}

fn check_reading(odometer: f64) -> Result<()> {
    if !odometer.is_finite() || odometer < 0.0 {
        return Err(Error::Validation(format!(
            "Odometer reading {} is not a non-negative number",
            odometer
        )));
    }
    Ok(())
}

impl Database {
    /// Create a mileage log entry
    pub fn create_mileage_log(&self, log: &NewMileageLogEntry) -> Result<i64> {
        check_reading(log.odometer)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO mileage_logs (vehicle_id, date, odometer, description, is_business_use)
             VALUES (?, ?, ?, ?, ?)",
            params![
                log.vehicle_id,
                log.date.to_string(),
                log.odometer,
                log.description,
                log.is_business_use
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get all mileage logs for a vehicle
    ///
    /// No date ordering is applied here; that is the ledger's job. Rows come
    /// back in insertion order so same-day ties stay deterministic.
    pub fn get_mileage_logs(&self, vehicle_id: i64) -> Result<Vec<MileageLogEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM mileage_logs WHERE vehicle_id = ? ORDER BY id",
            MILEAGE_COLUMNS
        ))?;

        let logs = stmt
            .query_map(params![vehicle_id], row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    /// Get a single mileage log entry by ID
    pub fn get_mileage_log(&self, id: i64) -> Result<Option<MileageLogEntry>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM mileage_logs WHERE id = ?", MILEAGE_COLUMNS),
            params![id],
            row_to_entry,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Update a mileage log entry (the owning vehicle never changes)
    pub fn update_mileage_log(&self, log: &MileageLogEntry) -> Result<()> {
        check_reading(log.odometer)?;
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE mileage_logs
             SET date = ?, odometer = ?, description = ?, is_business_use = ?
             WHERE id = ?",
            params![
                log.date.to_string(),
                log.odometer,
                log.description,
                log.is_business_use,
                log.id
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Mileage log entry {}", log.id)));
        }
        Ok(())
    }

    /// Delete a mileage log entry
    pub fn delete_mileage_log(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM mileage_logs WHERE id = ?", params![id])?;
        Ok(())
    }

    /// Count mileage logs for a vehicle
    pub fn count_mileage_logs(&self, vehicle_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM mileage_logs WHERE vehicle_id = ?",
            params![vehicle_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
