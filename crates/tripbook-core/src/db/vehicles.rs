//! Vehicle operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewVehicle, Vehicle};

const VEHICLE_COLUMNS: &str = "id, name, baseline_odometer, archived, created_at";

fn row_to_vehicle(row: &Row<'_>) -> rusqlite::Result<Vehicle> {
    let created_at_str: String = row.get(4)?;
    Ok(Vehicle {
        id: row.get(0)?,
        name: row.get(1)?,
        baseline_odometer: row.get(2)?,
        archived: row.get(3)?,
        created_at: parse_datetime(&created_at_str),
    })
}

fn validate_baseline(baseline: f64) -> Result<()> {
    if !baseline.is_finite() || baseline < 0.0 {
        return Err(Error::Validation(
            "Baseline odometer must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

impl Database {
    /// Enroll a new vehicle
    pub fn create_vehicle(&self, vehicle: &NewVehicle) -> Result<i64> {
        let name = vehicle.name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Vehicle name is required".to_string()));
        }
        validate_baseline(vehicle.baseline_odometer)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO vehicles (name, baseline_odometer) VALUES (?, ?)",
            params![name, vehicle.baseline_odometer],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a vehicle by ID
    pub fn get_vehicle(&self, id: i64) -> Result<Option<Vehicle>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM vehicles WHERE id = ?", VEHICLE_COLUMNS),
            params![id],
            row_to_vehicle,
        )
        .optional()
        .map_err(Into::into)
    }

    /// List vehicles, optionally including archived
    pub fn list_vehicles(&self, include_archived: bool) -> Result<Vec<Vehicle>> {
        let conn = self.conn()?;
        let query = if include_archived {
            format!("SELECT {} FROM vehicles ORDER BY name", VEHICLE_COLUMNS)
        } else {
            format!(
                "SELECT {} FROM vehicles WHERE archived = 0 ORDER BY name",
                VEHICLE_COLUMNS
            )
        };

        let mut stmt = conn.prepare(&query)?;
        let vehicles = stmt
            .query_map([], row_to_vehicle)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(vehicles)
    }

    /// Update a vehicle's name and/or baseline
    ///
    /// Changing the baseline changes the first entry's distance on the next
    /// reconcile; no stored entry is touched.
    pub fn update_vehicle(
        &self,
        id: i64,
        name: Option<&str>,
        baseline_odometer: Option<f64>,
    ) -> Result<()> {
        if let Some(baseline) = baseline_odometer {
            validate_baseline(baseline)?;
        }
        let name = name.map(str::trim);
        if name == Some("") {
            return Err(Error::Validation("Vehicle name is required".to_string()));
        }

        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE vehicles SET name = COALESCE(?, name),
                    baseline_odometer = COALESCE(?, baseline_odometer)
             WHERE id = ?",
            params![name, baseline_odometer, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Vehicle {}", id)));
        }
        Ok(())
    }

    /// Archive a vehicle (hidden from default lists, logs kept)
    pub fn archive_vehicle(&self, id: i64) -> Result<()> {
        self.set_vehicle_archived(id, true)
    }

    /// Unarchive a vehicle
    pub fn unarchive_vehicle(&self, id: i64) -> Result<()> {
        self.set_vehicle_archived(id, false)
    }

    fn set_vehicle_archived(&self, id: i64, archived: bool) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE vehicles SET archived = ? WHERE id = ?",
            params![archived, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Vehicle {}", id)));
        }
        Ok(())
    }

    /// Delete a vehicle and all of its mileage logs
    pub fn delete_vehicle(&self, id: i64) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM mileage_logs WHERE vehicle_id = ?", params![id])?;
        let deleted = tx.execute("DELETE FROM vehicles WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Vehicle {}", id)));
        }
        tx.commit()?;
        Ok(())
    }
}
