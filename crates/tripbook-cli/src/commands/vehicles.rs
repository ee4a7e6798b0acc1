//! Vehicle command implementations

use anyhow::{Context, Result};
use tripbook_core::{Config, Database, MileageService, NewVehicle};

use super::truncate;

/// List vehicles
pub fn cmd_vehicles_list(db: &Database, show_archived: bool) -> Result<()> {
    let vehicles = db.list_vehicles(show_archived)?;

    if vehicles.is_empty() {
        println!("No vehicles found. Add one with:");
        println!("  tripbook vehicles add <name> --baseline <odometer>");
        return Ok(());
    }

    println!();
    println!("🚗 Vehicles");
    println!("   ─────────────────────────────────────────────────────────");
    println!(
        "   {:>4} │ {:24} │ {:>12} │ {}",
        "ID", "Name", "Baseline", "Status"
    );
    println!("   ─────┼──────────────────────────┼──────────────┼──────────");

    for vehicle in vehicles {
        let status = if vehicle.archived {
            "archived"
        } else {
            "active"
        };
        println!(
            "   {:>4} │ {:24} │ {:>12.1} │ {}",
            vehicle.id,
            truncate(&vehicle.name, 24),
            vehicle.baseline_odometer,
            status
        );
    }

    Ok(())
}

/// Enroll a new vehicle
pub fn cmd_vehicles_add(db: &Database, name: &str, baseline: f64) -> Result<i64> {
    let id = db
        .create_vehicle(&NewVehicle {
            name: name.to_string(),
            baseline_odometer: baseline,
        })
        .context("Failed to add vehicle")?;

    println!(
        "✅ Added vehicle '{}' (id: {}, baseline: {:.1})",
        name.trim(),
        id,
        baseline
    );
    Ok(id)
}

/// Show a vehicle and its totals
pub fn cmd_vehicles_show(db: &Database, config: &Config, id: i64) -> Result<()> {
    let service = MileageService::new(db, config);
    let ledger = service.ledger(id, service.active_style()?)?;
    let vehicle = &ledger.vehicle;
    let summary = &ledger.summary;
    let unit = config.distance_unit;

    println!();
    println!("🚗 {} (id: {})", vehicle.name, vehicle.id);
    println!("   ─────────────────────────────");
    println!("   Baseline odometer: {:.1}", vehicle.baseline_odometer);
    println!("   Last reading:      {:.1}", ledger.ledger.last_odometer());
    println!("   Entries:           {}", summary.entry_count);
    println!("   Total distance:    {:.1} {}", summary.total_distance, unit);
    println!(
        "   Business:          {:.1} {} ({:.0}%)",
        summary.business_distance,
        unit,
        summary.business_share * 100.0
    );
    if vehicle.archived {
        println!("   Status:            archived");
    }

    Ok(())
}

/// Rename a vehicle or correct its baseline
pub fn cmd_vehicles_update(
    db: &Database,
    id: i64,
    name: Option<&str>,
    baseline: Option<f64>,
) -> Result<()> {
    if name.is_none() && baseline.is_none() {
        anyhow::bail!("Nothing to update (use --name and/or --baseline)");
    }
    db.update_vehicle(id, name, baseline)?;
    println!("✅ Updated vehicle {}", id);
    if baseline.is_some() {
        println!("   First entry's distance now measures from the new baseline");
    }
    Ok(())
}

/// Archive a vehicle
pub fn cmd_vehicles_archive(db: &Database, id: i64) -> Result<()> {
    db.archive_vehicle(id)?;
    println!("📦 Archived vehicle {}", id);
    Ok(())
}

/// Unarchive a vehicle
pub fn cmd_vehicles_unarchive(db: &Database, id: i64) -> Result<()> {
    db.unarchive_vehicle(id)?;
    println!("✅ Unarchived vehicle {}", id);
    Ok(())
}

/// Delete a vehicle and its log
pub fn cmd_vehicles_delete(db: &Database, id: i64) -> Result<()> {
    let count = db.count_mileage_logs(id)?;
    db.delete_vehicle(id)?;
    println!("🗑️  Deleted vehicle {} and {} mileage entries", id, count);
    Ok(())
}
