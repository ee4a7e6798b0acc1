//! Export of a reconciled mileage ledger
//!
//! Supports:
//! - CSV mileage log (one row per entry, oldest first) for tax records
//! - JSON dump of vehicle, summary and reconciled entries

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::service::VehicleLedger;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown export format: {} (use csv or json)", s)),
        }
    }
}

/// One CSV row of the mileage log
#[derive(Debug, Serialize)]
struct MileageExportRow<'a> {
    date: String,
    description: &'a str,
    odometer: f64,
    distance: f64,
    business: bool,
    running_total: f64,
}

/// Write the ledger in the requested format
pub fn export_ledger<W: Write>(
    ledger: &VehicleLedger,
    format: ExportFormat,
    writer: W,
) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv(ledger, writer),
        ExportFormat::Json => {
            serde_json::to_writer_pretty(writer, ledger)?;
            Ok(())
        }
    }
}

/// Render the ledger as a string
pub fn export_ledger_string(ledger: &VehicleLedger, format: ExportFormat) -> Result<String> {
    let mut buf = Vec::new();
    export_ledger(ledger, format, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_csv<W: Write>(ledger: &VehicleLedger, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    for reconciled in ledger.ledger.ascending() {
        let entry = &reconciled.entry;
        csv.serialize(MileageExportRow {
            date: entry.date.to_string(),
            description: entry.description.as_deref().unwrap_or(""),
            odometer: entry.odometer,
            distance: reconciled.distance,
            business: entry.is_business_use,
            running_total: reconciled.running_total,
        })?;
    }

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::MileageSummary;
    use crate::models::LoggingStyle;
    use crate::reconcile::reconcile;
    use crate::test_utils::{entry_with, vehicle};

    fn sample() -> VehicleLedger {
        let ledger = reconcile(
            vec![
                entry_with(2, "2024-01-05", 10_250.0, Some("Grocery run, Trader Joe's"), false),
                entry_with(1, "2024-01-01", 10_100.0, Some("Client meeting"), true),
            ],
            10_000.0,
        );
        VehicleLedger {
            vehicle: vehicle(1, 10_000.0),
            logging_style: LoggingStyle::Odometer,
            summary: MileageSummary::from_ledger(&ledger),
            ledger,
        }
    }

    #[test]
    fn test_csv_export() {
        let csv = export_ledger_string(&sample(), ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "date,description,odometer,distance,business,running_total"
        );
        assert_eq!(lines[1], "2024-01-01,Client meeting,10100.0,100.0,true,100.0");
        // Commas in descriptions are quoted
        assert_eq!(
            lines[2],
            "2024-01-05,\"Grocery run, Trader Joe's\",10250.0,150.0,false,250.0"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_json_export() {
        let json = export_ledger_string(&sample(), ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["vehicle"]["id"], 1);
        assert_eq!(value["summary"]["total_distance"], 250.0);
        assert_eq!(value["summary"]["business_distance"], 100.0);
        assert_eq!(value["entries"][0]["id"], 2);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
