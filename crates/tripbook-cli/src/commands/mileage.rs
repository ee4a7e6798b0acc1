//! Mileage log command implementations

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tripbook_core::aggregate::format_date;
use tripbook_core::resolve::INPUT_DATE_FORMAT;
use tripbook_core::{
    export_ledger_string, Config, Database, ExportFormat, LedgerFilter, MileageInput,
    MileageLogEntry, MileageService,
};

use super::{parse_style, truncate};

/// Filter options for `mileage list`
#[derive(Debug, Default)]
pub struct ListOptions<'a> {
    pub search: Option<&'a str>,
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
    pub business_only: bool,
    pub style: Option<&'a str>,
}

fn parse_date_arg(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value
        .map(|s| NaiveDate::parse_from_str(s, INPUT_DATE_FORMAT))
        .transpose()
        .with_context(|| format!("Invalid --{} date format (use YYYY-MM-DD)", flag))
}

/// Show the reconciled log, most recent first
pub fn cmd_mileage_list(
    db: &Database,
    config: &Config,
    vehicle_id: i64,
    opts: &ListOptions<'_>,
) -> Result<()> {
    let style = parse_style(db, config, opts.style)?;
    let filter = LedgerFilter::new()
        .search(opts.search)
        .from(parse_date_arg(opts.from, "from")?)
        .to(parse_date_arg(opts.to, "to")?)
        .business_only(opts.business_only)
        .date_format(&config.date_format);

    let ledger = MileageService::new(db, config).ledger(vehicle_id, style)?;
    let entries = ledger.filtered(&filter);
    let unit = config.distance_unit;

    if ledger.ledger.is_empty() {
        println!(
            "No mileage logged for {} yet. Add an entry with:",
            ledger.vehicle.name
        );
        println!(
            "  tripbook mileage add {} <{}>",
            vehicle_id,
            style.value_label().to_lowercase()
        );
        return Ok(());
    }

    println!();
    println!("🛣️  {} mileage ({})", ledger.vehicle.name, style.value_label());
    println!("   ──────────────────────────────────────────────────────────────────────");
    println!(
        "   {:>4} │ {:12} │ {:>10} │ {:>8} │ {:3} │ {}",
        "ID", "Date", "Odometer", "Distance", "Biz", "Description"
    );
    println!("   ─────┼──────────────┼────────────┼──────────┼─────┼─────────────────────");

    for reconciled in &entries {
        let entry = &reconciled.entry;
        let flag = if reconciled.is_rollback() { " ⚠️" } else { "" };
        println!(
            "   {:>4} │ {:12} │ {:>10.1} │ {:>8.1} │ {:3} │ {}{}",
            entry.id,
            format_date(entry.date, &config.date_format)
                .unwrap_or_else(|| entry.date.to_string()),
            entry.odometer,
            reconciled.distance,
            if entry.is_business_use { "yes" } else { "no" },
            truncate(entry.description.as_deref().unwrap_or("-"), 30),
            flag
        );
    }

    if !filter.is_empty() {
        println!();
        println!(
            "   Showing {} of {} entries",
            entries.len(),
            ledger.ledger.len()
        );
    }

    println!();
    println!(
        "   Total: {:.1} {}  Business: {:.1} {}",
        ledger.summary.total_distance, unit, ledger.summary.business_distance, unit
    );
    if ledger.summary.rollback_count > 0 {
        println!(
            "   ⚠️  {} reading(s) lower than the previous entry were counted as zero",
            ledger.summary.rollback_count
        );
    }

    Ok(())
}

/// Options for `mileage add`
#[derive(Debug, Default)]
pub struct AddOptions<'a> {
    pub date: Option<&'a str>,
    pub description: Option<&'a str>,
    pub personal: bool,
    pub style: Option<&'a str>,
}

/// Record a new entry
pub fn cmd_mileage_add(
    db: &Database,
    config: &Config,
    vehicle_id: i64,
    value: f64,
    opts: &AddOptions<'_>,
) -> Result<MileageLogEntry> {
    let style = parse_style(db, config, opts.style)?;
    let date = opts
        .date
        .map(String::from)
        .unwrap_or_else(|| Local::now().date_naive().format(INPUT_DATE_FORMAT).to_string());

    let mut input = MileageInput::new(date, value);
    if let Some(description) = opts.description {
        input = input.description(description);
    }
    if opts.personal {
        input = input.personal();
    }

    let entry = MileageService::new(db, config).record(vehicle_id, style, &input)?;

    println!(
        "✅ Logged entry {} on {} (odometer {:.1})",
        entry.id, entry.date, entry.odometer
    );
    Ok(entry)
}

/// Changes requested by `mileage edit`
#[derive(Debug, Default)]
pub struct EditOptions<'a> {
    pub value: Option<f64>,
    pub date: Option<&'a str>,
    pub description: Option<&'a str>,
    pub business: Option<bool>,
    pub style: Option<&'a str>,
}

/// Edit an entry; unset fields keep their current values
pub fn cmd_mileage_edit(
    db: &Database,
    config: &Config,
    id: i64,
    opts: &EditOptions<'_>,
) -> Result<MileageLogEntry> {
    let style = parse_style(db, config, opts.style)?;
    let service = MileageService::new(db, config);

    // Unchanged fields come from what an edit form would pre-fill
    let current = service.entry_detail(id, style)?;
    let entry = &current.reconciled.entry;

    let input = MileageInput {
        date: opts
            .date
            .map(String::from)
            .unwrap_or_else(|| entry.date.format(INPUT_DATE_FORMAT).to_string()),
        value: opts.value.unwrap_or(current.editable_value),
        description: opts
            .description
            .map(String::from)
            .or_else(|| entry.description.clone()),
        is_business_use: opts.business.unwrap_or(entry.is_business_use),
    };

    let updated = service.edit(id, style, &input)?;

    println!(
        "✅ Updated entry {} (odometer {:.1} → {:.1})",
        id, entry.odometer, updated.odometer
    );
    Ok(updated)
}

/// Delete an entry
pub fn cmd_mileage_delete(db: &Database, config: &Config, id: i64) -> Result<()> {
    MileageService::new(db, config).delete(id)?;
    println!("🗑️  Deleted entry {}", id);
    Ok(())
}

/// Show totals for a vehicle
pub fn cmd_mileage_summary(db: &Database, config: &Config, vehicle_id: i64) -> Result<()> {
    let service = MileageService::new(db, config);
    let ledger = service.ledger(vehicle_id, service.active_style()?)?;
    let summary = &ledger.summary;
    let unit = config.distance_unit;

    println!();
    println!("📊 {} summary", ledger.vehicle.name);
    println!("   ─────────────────────────────");
    println!("   Entries:   {}", summary.entry_count);
    println!("   Total:     {:.1} {}", summary.total_distance, unit);
    println!(
        "   Business:  {:.1} {} ({:.0}%)",
        summary.business_distance,
        unit,
        summary.business_share * 100.0
    );
    println!("   Personal:  {:.1} {}", summary.personal_distance, unit);
    if let Some(deduction) = summary.estimated_deduction {
        println!("   Estimated deduction: {:.2}", deduction);
    }
    if summary.rollback_count > 0 {
        println!(
            "   ⚠️  {} odometer rollback(s) counted as zero distance",
            summary.rollback_count
        );
    }

    Ok(())
}

/// Export the reconciled log to a file or stdout
pub fn cmd_mileage_export(
    db: &Database,
    config: &Config,
    vehicle_id: i64,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let format: ExportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let service = MileageService::new(db, config);
    let ledger = service.ledger(vehicle_id, service.active_style()?)?;
    let content = export_ledger_string(&ledger, format)?;

    match output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            file.write_all(content.as_bytes())?;

            println!(
                "✅ Exported {} entries to {}",
                ledger.ledger.len(),
                path.display()
            );
        }
        None => {
            // Write to stdout
            print!("{}", content);
        }
    }

    Ok(())
}
