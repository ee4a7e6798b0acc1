//! Mileage store abstraction
//!
//! The core never owns persistence. Everything it needs from the outside
//! world goes through [`MileageStore`]: an unordered fetch of a vehicle's
//! entries, the vehicle baseline, the user's saved logging style, and
//! writes of already resolved absolute readings.

use crate::error::Result;
use crate::models::{LoggingStyle, MileageLogEntry, NewMileageLogEntry, Vehicle};

/// Collaborator interface for fetching and persisting mileage data
pub trait MileageStore {
    /// Get a vehicle (and its baseline odometer) by ID
    fn get_vehicle(&self, id: i64) -> Result<Option<Vehicle>>;

    /// All log entries for a vehicle, in no particular order
    fn list_mileage_entries(&self, vehicle_id: i64) -> Result<Vec<MileageLogEntry>>;

    /// Get a single log entry by ID
    fn get_mileage_entry(&self, id: i64) -> Result<Option<MileageLogEntry>>;

    /// Persist a new entry, returning its ID
    fn create_mileage_entry(&self, entry: &NewMileageLogEntry) -> Result<i64>;

    /// Replace an existing entry's date, reading, description and business flag
    fn update_mileage_entry(&self, entry: &MileageLogEntry) -> Result<()>;

    /// Delete a log entry by ID
    fn delete_mileage_entry(&self, id: i64) -> Result<()>;

    /// The user's saved logging style, if one has been chosen
    fn logging_style(&self) -> Result<Option<LoggingStyle>>;
}
