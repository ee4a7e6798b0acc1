//! Edit-path resolution
//!
//! Translates what the user typed (under the active [`LoggingStyle`]) into
//! the absolute odometer reading that gets persisted. The store only ever
//! sees absolute readings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ledger::{last_known_odometer, normalize};
use crate::models::{LoggingStyle, MileageLogEntry, NewMileageLogEntry};
use crate::reconcile::ReconciledEntry;

/// Wire format for input dates
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// A create or edit submission as entered by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MileageInput {
    /// Date as `YYYY-MM-DD`
    pub date: String,
    /// Odometer reading or trip distance, depending on logging style
    pub value: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_business_use")]
    pub is_business_use: bool,
}

fn default_business_use() -> bool {
    true
}

impl MileageInput {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value,
            description: None,
            is_business_use: true,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn personal(mut self) -> Self {
        self.is_business_use = false;
        self
    }
}

/// Parse a required `YYYY-MM-DD` date
pub fn parse_input_date(date: &str) -> Result<NaiveDate> {
    let date = date.trim();
    if date.is_empty() {
        return Err(Error::Validation("Date is required".to_string()));
    }
    NaiveDate::parse_from_str(date, INPUT_DATE_FORMAT)
        .map_err(|_| Error::Validation(format!("Invalid date '{}' (use YYYY-MM-DD)", date)))
}

fn validate_value(style: LoggingStyle, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::Validation(format!(
            "{} must be a positive number",
            style.value_label()
        )));
    }
    Ok(())
}

/// A trip edit may resubmit a zero distance, the pre-filled value of a
/// clamped or repeated reading
fn validate_trip_edit(value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Validation(format!(
            "{} must not be negative",
            LoggingStyle::TripDistance.value_label()
        )));
    }
    Ok(())
}

fn check_resolved(reading: f64) -> Result<f64> {
    if !reading.is_finite() || reading <= 0.0 {
        return Err(Error::Validation(format!(
            "Resolved odometer reading {} is not a positive number",
            reading
        )));
    }
    Ok(reading)
}

fn clean_description(description: &Option<String>) -> Option<String> {
    description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from)
}

/// Resolve a new log entry for `vehicle_id`
///
/// Under `trip_distance` the trip is appended to the chronologically-last
/// existing entry (or the baseline when there are none).
pub fn resolve_new(
    style: LoggingStyle,
    vehicle_id: i64,
    input: &MileageInput,
    existing: &[MileageLogEntry],
    baseline_odometer: f64,
) -> Result<NewMileageLogEntry> {
    let date = parse_input_date(&input.date)?;
    validate_value(style, input.value)?;

    let odometer = match style {
        LoggingStyle::Odometer => input.value,
        LoggingStyle::TripDistance => {
            last_known_odometer(existing, baseline_odometer) + input.value
        }
    };

    Ok(NewMileageLogEntry {
        vehicle_id,
        date,
        odometer: check_resolved(odometer)?,
        description: clean_description(&input.description),
        is_business_use: input.is_business_use,
    })
}

/// Resolve an edit to an existing entry
///
/// Under `trip_distance` the edited entry is first moved to its new date and
/// the whole ledger re-normalized; the trip is then measured from whatever
/// entry now precedes it (or the baseline). Entries after it keep their
/// absolute readings, so their distances shift on the next reconcile.
pub fn resolve_edit(
    style: LoggingStyle,
    entry_id: i64,
    input: &MileageInput,
    existing: &[MileageLogEntry],
    baseline_odometer: f64,
) -> Result<MileageLogEntry> {
    let current = existing
        .iter()
        .find(|e| e.id == entry_id)
        .ok_or_else(|| Error::NotFound(format!("Mileage log entry {}", entry_id)))?;

    let date = parse_input_date(&input.date)?;

    let odometer = match style {
        LoggingStyle::Odometer => {
            validate_value(style, input.value)?;
            input.value
        }
        LoggingStyle::TripDistance => {
            validate_trip_edit(input.value)?;
            let moved: Vec<MileageLogEntry> = existing
                .iter()
                .map(|e| {
                    let mut e = e.clone();
                    if e.id == entry_id {
                        e.date = date;
                    }
                    e
                })
                .collect();
            let ordered = normalize(moved);

            let predecessor = ordered
                .iter()
                .position(|e| e.id == entry_id)
                .and_then(|idx| idx.checked_sub(1))
                .map(|idx| ordered[idx].odometer)
                .unwrap_or(baseline_odometer);

            predecessor + input.value
        }
    };

    Ok(MileageLogEntry {
        id: current.id,
        vehicle_id: current.vehicle_id,
        date,
        odometer: check_resolved(odometer)?,
        description: clean_description(&input.description),
        is_business_use: input.is_business_use,
        created_at: current.created_at,
    })
}

/// Value to pre-fill in an edit form for this entry
pub fn editable_value(style: LoggingStyle, reconciled: &ReconciledEntry) -> f64 {
    match style {
        LoggingStyle::Odometer => reconciled.entry.odometer,
        LoggingStyle::TripDistance => reconciled.distance,
    }
}
