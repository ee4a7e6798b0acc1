//! Distance reconciliation
//!
//! Walks the normalized ledger with a cursor that starts at the vehicle
//! baseline. Each entry's distance is `max(0, reading - cursor)`, and the
//! cursor then moves to the entry's own reading (never to the clamped value),
//! so a single low reading produces one zero-distance entry instead of
//! skewing everything after it.
//!
//! Distances are only ever computed on the ascending pass. The display order
//! (most recent first) is derived from the already reconciled entries.

use serde::{Deserialize, Serialize};

use crate::ledger::normalize;
use crate::models::MileageLogEntry;

/// A log entry with its derived distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledEntry {
    #[serde(flatten)]
    pub entry: MileageLogEntry,
    /// Distance attributed to this entry, clamped at zero
    pub distance: f64,
    /// Unclamped `reading - previous reading`. Negative on an odometer
    /// rollback; diagnostic only, never summed.
    pub raw_delta: f64,
    /// Cumulative distance up to and including this entry (ascending order)
    pub running_total: f64,
}

impl ReconciledEntry {
    /// True when the reading went backwards relative to its predecessor
    pub fn is_rollback(&self) -> bool {
        self.raw_delta < 0.0
    }
}

/// The reconciled view of one vehicle's full ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledLedger {
    pub baseline_odometer: f64,
    /// Entries in ascending date order
    entries: Vec<ReconciledEntry>,
}

impl ReconciledLedger {
    /// Entries in the order distances were computed (oldest first)
    pub fn ascending(&self) -> &[ReconciledEntry] {
        &self.entries
    }

    /// Entries most recent first, carrying the distances computed on the
    /// ascending pass
    pub fn display_order(&self) -> Vec<&ReconciledEntry> {
        self.entries.iter().rev().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a reconciled entry by id
    pub fn get(&self, id: i64) -> Option<&ReconciledEntry> {
        self.entries.iter().find(|e| e.entry.id == id)
    }

    /// Entries whose reading is lower than their predecessor's
    pub fn anomalies(&self) -> Vec<&ReconciledEntry> {
        self.entries.iter().filter(|e| e.is_rollback()).collect()
    }

    /// Absolute reading of the last entry, or the baseline
    pub fn last_odometer(&self) -> f64 {
        self.entries
            .last()
            .map(|e| e.entry.odometer)
            .unwrap_or(self.baseline_odometer)
    }
}

/// Normalize and reconcile a vehicle's entries against its baseline
pub fn reconcile(entries: Vec<MileageLogEntry>, baseline_odometer: f64) -> ReconciledLedger {
    let ordered = normalize(entries);

    let mut previous = baseline_odometer;
    let mut running_total = 0.0;
    let mut reconciled = Vec::with_capacity(ordered.len());

    for entry in ordered {
        let raw_delta = entry.odometer - previous;
        let distance = raw_delta.max(0.0);
        running_total += distance;
        previous = entry.odometer;

        reconciled.push(ReconciledEntry {
            entry,
            distance,
            raw_delta,
            running_total,
        });
    }

    ReconciledLedger {
        baseline_odometer,
        entries: reconciled,
    }
}
