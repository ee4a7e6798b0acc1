//! Test utilities
//!
//! Builders for log entries and a [`FailingStore`] that lets tests check how
//! store failures surface through the service layer.

use std::cell::RefCell;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::models::{LoggingStyle, MileageLogEntry, NewMileageLogEntry, Vehicle};
use crate::store::MileageStore;

/// Fixed creation timestamp so entries compare equal across runs
pub fn fixed_created_at() -> DateTime<Utc> {
    DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default()
}

/// Business-use entry for vehicle 1 with no description
pub fn entry(id: i64, date: &str, odometer: f64) -> MileageLogEntry {
    entry_with(id, date, odometer, None, true)
}

/// Entry for vehicle 1 with description and business flag
pub fn entry_with(
    id: i64,
    date: &str,
    odometer: f64,
    description: Option<&str>,
    is_business_use: bool,
) -> MileageLogEntry {
    MileageLogEntry {
        id,
        vehicle_id: 1,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap_or_default(),
        odometer,
        description: description.map(String::from),
        is_business_use,
        created_at: fixed_created_at(),
    }
}

/// Vehicle with the given baseline
pub fn vehicle(id: i64, baseline_odometer: f64) -> Vehicle {
    Vehicle {
        id,
        name: format!("Vehicle {}", id),
        baseline_odometer,
        archived: false,
        created_at: fixed_created_at(),
    }
}

/// In-memory store that can be told to fail reads or writes
pub struct FailingStore {
    pub vehicle: Option<Vehicle>,
    pub entries: RefCell<Vec<MileageLogEntry>>,
    pub style: Option<LoggingStyle>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl FailingStore {
    /// A store with one vehicle whose reads succeed and writes fail
    pub fn failing_writes(vehicle: Vehicle, entries: Vec<MileageLogEntry>) -> Self {
        Self {
            vehicle: Some(vehicle),
            entries: RefCell::new(entries),
            style: None,
            fail_reads: false,
            fail_writes: true,
        }
    }

    /// A store whose every read fails
    pub fn failing_reads() -> Self {
        Self {
            vehicle: None,
            entries: RefCell::new(vec![]),
            style: None,
            fail_reads: true,
            fail_writes: true,
        }
    }

    fn read(&self) -> Result<()> {
        if self.fail_reads {
            return Err(Error::Store("simulated fetch failure".to_string()));
        }
        Ok(())
    }

    fn write(&self) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Store("simulated write failure".to_string()));
        }
        Ok(())
    }
}

impl MileageStore for FailingStore {
    fn get_vehicle(&self, id: i64) -> Result<Option<Vehicle>> {
        self.read()?;
        Ok(self.vehicle.clone().filter(|v| v.id == id))
    }

    fn list_mileage_entries(&self, vehicle_id: i64) -> Result<Vec<MileageLogEntry>> {
        self.read()?;
        Ok(self
            .entries
            .borrow()
            .iter()
            .filter(|e| e.vehicle_id == vehicle_id)
            .cloned()
            .collect())
    }

    fn get_mileage_entry(&self, id: i64) -> Result<Option<MileageLogEntry>> {
        self.read()?;
        Ok(self.entries.borrow().iter().find(|e| e.id == id).cloned())
    }

    fn create_mileage_entry(&self, entry: &NewMileageLogEntry) -> Result<i64> {
        self.write()?;
        let mut entries = self.entries.borrow_mut();
        let id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        entries.push(MileageLogEntry {
            id,
            vehicle_id: entry.vehicle_id,
            date: entry.date,
            odometer: entry.odometer,
            description: entry.description.clone(),
            is_business_use: entry.is_business_use,
            created_at: fixed_created_at(),
        });
        Ok(id)
    }

    fn update_mileage_entry(&self, entry: &MileageLogEntry) -> Result<()> {
        self.write()?;
        let mut entries = self.entries.borrow_mut();
        if let Some(existing) = entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry.clone();
        }
        Ok(())
    }

    fn delete_mileage_entry(&self, id: i64) -> Result<()> {
        self.write()?;
        self.entries.borrow_mut().retain(|e| e.id != id);
        Ok(())
    }

    fn logging_style(&self) -> Result<Option<LoggingStyle>> {
        self.read()?;
        Ok(self.style)
    }
}
