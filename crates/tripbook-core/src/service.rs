//! Mileage service
//!
//! Wires the store to the core computations. Every read re-fetches the full
//! entry set and reconciles from scratch; every write resolves the user's
//! input to an absolute reading against a freshly fetched ledger. Nothing is
//! cached between calls.

use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::aggregate::{LedgerFilter, MileageSummary};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{LoggingStyle, MileageLogEntry, Vehicle};
use crate::reconcile::{reconcile, ReconciledEntry, ReconciledLedger};
use crate::resolve::{editable_value, resolve_edit, resolve_new, MileageInput};
use crate::store::MileageStore;

/// A vehicle with its reconciled ledger and totals
#[derive(Debug, Clone, Serialize)]
pub struct VehicleLedger {
    pub vehicle: Vehicle,
    pub logging_style: LoggingStyle,
    pub summary: MileageSummary,
    /// Serialized most-recent-first as `entries`
    #[serde(rename = "entries", serialize_with = "serialize_display_order")]
    pub ledger: ReconciledLedger,
}

fn serialize_display_order<S: Serializer>(
    ledger: &ReconciledLedger,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(ledger.display_order())
}

impl VehicleLedger {
    /// Entries matching `filter`, most recent first. Totals are unaffected.
    pub fn filtered(&self, filter: &LedgerFilter<'_>) -> Vec<&ReconciledEntry> {
        filter.apply(&self.ledger)
    }
}

/// A single entry as shown in an edit form
#[derive(Debug, Clone, Serialize)]
pub struct EntryDetail {
    #[serde(flatten)]
    pub reconciled: ReconciledEntry,
    pub logging_style: LoggingStyle,
    /// Value to pre-fill for the active logging style
    pub editable_value: f64,
}

/// Mileage operations over a [`MileageStore`]
pub struct MileageService<'a, S: MileageStore + ?Sized> {
    store: &'a S,
    config: &'a Config,
}

impl<'a, S: MileageStore + ?Sized> MileageService<'a, S> {
    pub fn new(store: &'a S, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// The user's saved logging style, or the configured default
    pub fn active_style(&self) -> Result<LoggingStyle> {
        Ok(self
            .store
            .logging_style()?
            .unwrap_or(self.config.default_logging_style))
    }

    /// Fetch a vehicle or fail with `NotFound`
    pub fn vehicle(&self, vehicle_id: i64) -> Result<Vehicle> {
        self.store
            .get_vehicle(vehicle_id)?
            .ok_or_else(|| Error::NotFound(format!("Vehicle {}", vehicle_id)))
    }

    fn entry(&self, entry_id: i64) -> Result<MileageLogEntry> {
        self.store
            .get_mileage_entry(entry_id)?
            .ok_or_else(|| Error::NotFound(format!("Mileage log entry {}", entry_id)))
    }

    /// Reconcile a vehicle's full ledger
    pub fn ledger(&self, vehicle_id: i64, style: LoggingStyle) -> Result<VehicleLedger> {
        let vehicle = self.vehicle(vehicle_id)?;
        let entries = self.store.list_mileage_entries(vehicle_id)?;
        let ledger = reconcile(entries, vehicle.baseline_odometer);

        for anomaly in ledger.anomalies() {
            warn!(
                vehicle_id,
                entry_id = anomaly.entry.id,
                date = %anomaly.entry.date,
                raw_delta = anomaly.raw_delta,
                "Odometer reading lower than previous entry, counted as zero distance"
            );
        }

        let summary = MileageSummary::from_ledger(&ledger).with_rate(self.config.mileage_rate);
        debug!(
            vehicle_id,
            entries = summary.entry_count,
            total = summary.total_distance,
            business = summary.business_distance,
            "Reconciled mileage ledger"
        );

        Ok(VehicleLedger {
            vehicle,
            logging_style: style,
            summary,
            ledger,
        })
    }

    /// Reconciled entry plus the value its edit form should show
    pub fn entry_detail(&self, entry_id: i64, style: LoggingStyle) -> Result<EntryDetail> {
        let entry = self.entry(entry_id)?;
        let ledger = self.ledger(entry.vehicle_id, style)?;
        let reconciled = ledger
            .ledger
            .get(entry_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Mileage log entry {}", entry_id)))?;

        Ok(EntryDetail {
            editable_value: editable_value(style, &reconciled),
            reconciled,
            logging_style: style,
        })
    }

    /// Resolve and persist a new log entry
    pub fn record(
        &self,
        vehicle_id: i64,
        style: LoggingStyle,
        input: &MileageInput,
    ) -> Result<MileageLogEntry> {
        let vehicle = self.vehicle(vehicle_id)?;
        let existing = self.store.list_mileage_entries(vehicle_id)?;

        let new_entry = resolve_new(
            style,
            vehicle_id,
            input,
            &existing,
            vehicle.baseline_odometer,
        )?;
        let id = self.store.create_mileage_entry(&new_entry)?;

        info!(
            vehicle_id,
            entry_id = id,
            style = %style,
            odometer = new_entry.odometer,
            "Recorded mileage entry"
        );

        self.entry(id)
    }

    /// Resolve and persist an edit to an existing entry
    pub fn edit(
        &self,
        entry_id: i64,
        style: LoggingStyle,
        input: &MileageInput,
    ) -> Result<MileageLogEntry> {
        let current = self.entry(entry_id)?;
        let vehicle = self.vehicle(current.vehicle_id)?;
        let existing = self.store.list_mileage_entries(current.vehicle_id)?;

        let updated = resolve_edit(
            style,
            entry_id,
            input,
            &existing,
            vehicle.baseline_odometer,
        )?;
        self.store.update_mileage_entry(&updated)?;

        info!(
            vehicle_id = current.vehicle_id,
            entry_id,
            style = %style,
            old_odometer = current.odometer,
            odometer = updated.odometer,
            "Updated mileage entry"
        );

        Ok(updated)
    }

    /// Delete a log entry
    pub fn delete(&self, entry_id: i64) -> Result<()> {
        let entry = self.entry(entry_id)?;
        self.store.delete_mileage_entry(entry_id)?;
        info!(vehicle_id = entry.vehicle_id, entry_id, "Deleted mileage entry");
        Ok(())
    }
}
