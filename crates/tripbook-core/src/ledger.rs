//! Ledger normalization
//!
//! Produces the chronological view of a vehicle's mileage log that every
//! other computation walks. Entries are ordered ascending by date only; ties
//! keep the order the entries were supplied in. There is no
//! secondary key (not `id`, not `created_at`), so the result is deterministic
//! for a deterministic input order.

use crate::models::MileageLogEntry;

/// Order entries ascending by date (stable)
pub fn normalize(mut entries: Vec<MileageLogEntry>) -> Vec<MileageLogEntry> {
    // `sort_by_key` is stable, which is what keeps same-day entries in
    // supplied order.
    entries.sort_by_key(|e| e.date);
    entries
}

/// Absolute reading of the chronologically-last entry, or the baseline when
/// the ledger is empty
///
/// Uses the same ordering as [`normalize`]: among entries sharing the latest
/// date, the one supplied last wins.
pub fn last_known_odometer(entries: &[MileageLogEntry], baseline: f64) -> f64 {
    entries
        .iter()
        .enumerate()
        .max_by_key(|(idx, e)| (e.date, *idx))
        .map(|(_, e)| e.odometer)
        .unwrap_or(baseline)
}
