//! Domain models for Tripbook

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ========== Vehicle Models ==========

/// A vehicle whose mileage is tracked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,
    /// Odometer value recorded when the vehicle was enrolled. Acts as the
    /// predecessor of the first log entry.
    pub baseline_odometer: f64,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

/// New vehicle for creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVehicle {
    pub name: String,
    pub baseline_odometer: f64,
}

// ========== Mileage Log Models ==========

/// A mileage log entry as persisted
///
/// `odometer` is always the resolved, absolute reading regardless of which
/// logging style the user entered it under. Distances are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MileageLogEntry {
    pub id: i64,
    pub vehicle_id: i64,
    pub date: NaiveDate,
    pub odometer: f64,
    /// Optional label (e.g., "Client meeting", "Callback at Stage 4")
    pub description: Option<String>,
    pub is_business_use: bool,
    pub created_at: DateTime<Utc>,
}

/// New mileage entry for creation, already resolved to an absolute reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMileageLogEntry {
    pub vehicle_id: i64,
    pub date: NaiveDate,
    pub odometer: f64,
    pub description: Option<String>,
    pub is_business_use: bool,
}

// ========== Settings ==========

/// How the user enters mileage
///
/// Only affects how input is interpreted and written back. Storage and
/// reconciliation always work on absolute readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoggingStyle {
    /// User enters absolute odometer readings
    #[default]
    Odometer,
    /// User enters the length of each trip
    TripDistance,
}

impl LoggingStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Odometer => "odometer",
            Self::TripDistance => "trip_distance",
        }
    }

    /// Label for the editable value field under this style
    pub fn value_label(&self) -> &'static str {
        match self {
            Self::Odometer => "Odometer",
            Self::TripDistance => "Trip distance",
        }
    }
}

impl std::str::FromStr for LoggingStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "odometer" => Ok(Self::Odometer),
            "trip_distance" | "trip" => Ok(Self::TripDistance),
            _ => Err(format!("Unknown logging style: {}", s)),
        }
    }
}

impl std::fmt::Display for LoggingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Distance unit label (no conversion is ever applied)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Mi,
    Km,
}

impl DistanceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mi => "mi",
            Self::Km => "km",
        }
    }
}

impl std::fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
