//! Tripbook Core Library
//!
//! Vehicle mileage tracking for tax and expense reporting:
//! - Database access and migrations
//! - Ledger normalization and distance reconciliation
//! - Totals and display filtering over the reconciled ledger
//! - Resolution of odometer or trip-distance input to absolute readings
//! - Ledger export (CSV/JSON)

pub mod aggregate;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod reconcile;
pub mod resolve;
pub mod service;
pub mod store;

/// Test utilities including a store that fails on demand
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{LedgerFilter, MileageSummary};
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use export::{export_ledger, export_ledger_string, ExportFormat};
pub use models::{
    DistanceUnit, LoggingStyle, MileageLogEntry, NewMileageLogEntry, NewVehicle, Vehicle,
};
pub use reconcile::{reconcile, ReconciledEntry, ReconciledLedger};
pub use resolve::MileageInput;
pub use service::{EntryDetail, MileageService, VehicleLedger};
pub use store::MileageStore;
