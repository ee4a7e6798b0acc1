//! Ledger summaries and display filtering
//!
//! Totals are always taken over the full reconciled ledger. Filtering is a
//! display concern: it selects references into the ledger and never touches
//! or recomputes distances.

use std::fmt::Write;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reconcile::{ReconciledEntry, ReconciledLedger};

/// Default display date format, e.g. "Jan 5, 2024"
pub const DEFAULT_DATE_FORMAT: &str = "%b %-d, %Y";

/// Render a date with a strftime format, or `None` when the format needs
/// fields a plain date does not have (e.g. `%H` or `%z`)
pub fn format_date(date: NaiveDate, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).ok()?;
    Some(out)
}

/// Totals for one vehicle's ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MileageSummary {
    pub entry_count: usize,
    pub total_distance: f64,
    pub business_distance: f64,
    pub personal_distance: f64,
    /// Business share of total distance (0.0 when nothing has been driven)
    pub business_share: f64,
    /// Number of entries whose reading went backwards
    pub rollback_count: usize,
    /// `business_distance * mileage_rate`, when a rate is configured
    pub estimated_deduction: Option<f64>,
}

impl MileageSummary {
    /// Summarize a full reconciled ledger
    pub fn from_ledger(ledger: &ReconciledLedger) -> Self {
        let entries = ledger.ascending();

        let total_distance: f64 = entries.iter().map(|e| e.distance).sum();
        let business_distance: f64 = entries
            .iter()
            .filter(|e| e.entry.is_business_use)
            .map(|e| e.distance)
            .sum();

        let business_share = if total_distance > 0.0 {
            business_distance / total_distance
        } else {
            0.0
        };

        Self {
            entry_count: entries.len(),
            total_distance,
            business_distance,
            personal_distance: total_distance - business_distance,
            business_share,
            rollback_count: entries.iter().filter(|e| e.is_rollback()).count(),
            estimated_deduction: None,
        }
    }

    /// Attach a deduction estimate for the given per-unit rate
    pub fn with_rate(mut self, rate: Option<f64>) -> Self {
        self.estimated_deduction = rate
            .filter(|r| r.is_finite() && *r >= 0.0)
            .map(|r| self.business_distance * r);
        self
    }
}

/// Builder for filtering a reconciled ledger for display
///
/// The lifetime `'query` is how long the search text must stay valid.
#[derive(Debug, Clone)]
pub struct LedgerFilter<'query> {
    pub search: Option<&'query str>,
    pub date_range: (Option<NaiveDate>, Option<NaiveDate>),
    pub business_only: bool,
    pub date_format: &'query str,
}

impl Default for LedgerFilter<'_> {
    fn default() -> Self {
        Self {
            search: None,
            date_range: (None, None),
            business_only: false,
            date_format: DEFAULT_DATE_FORMAT,
        }
    }
}

impl<'query> LedgerFilter<'query> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set free-text search (matches description and formatted date)
    pub fn search(mut self, query: Option<&'query str>) -> Self {
        self.search = query.map(str::trim).filter(|q| !q.is_empty());
        self
    }

    /// Set inclusive lower date bound
    pub fn from(mut self, date: Option<NaiveDate>) -> Self {
        self.date_range.0 = date;
        self
    }

    /// Set inclusive upper date bound
    pub fn to(mut self, date: Option<NaiveDate>) -> Self {
        self.date_range.1 = date;
        self
    }

    /// Only keep business-use entries
    pub fn business_only(mut self, value: bool) -> Self {
        self.business_only = value;
        self
    }

    /// Set the display date format searched in addition to ISO dates
    pub fn date_format(mut self, format: &'query str) -> Self {
        self.date_format = format;
        self
    }

    /// Whether a single entry passes the filter
    pub fn matches(&self, reconciled: &ReconciledEntry) -> bool {
        let entry = &reconciled.entry;

        if self.business_only && !entry.is_business_use {
            return false;
        }
        if let Some(from) = self.date_range.0 {
            if entry.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_range.1 {
            if entry.date > to {
                return false;
            }
        }

        match self.search {
            None => true,
            Some(query) => {
                let needle = query.to_lowercase();
                let description_hit = entry
                    .description
                    .as_deref()
                    .map(|d| d.to_lowercase().contains(&needle))
                    .unwrap_or(false);

                description_hit
                    || entry.date.to_string().contains(&needle)
                    || format_date(entry.date, self.date_format)
                        .map(|d| d.to_lowercase().contains(&needle))
                        .unwrap_or(false)
            }
        }
    }

    /// Matching entries, most recent first
    pub fn apply<'ledger>(
        &self,
        ledger: &'ledger ReconciledLedger,
    ) -> Vec<&'ledger ReconciledEntry> {
        ledger
            .display_order()
            .into_iter()
            .filter(|e| self.matches(e))
            .collect()
    }

    /// True when no criteria are set
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.date_range == (None, None)
            && !self.business_only
    }
}
