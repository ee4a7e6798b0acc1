//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_config` - Shared utility to resolve configuration
//! - `parse_style` - Resolve a `--style` override against the saved style
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use tripbook_core::{Config, Database, LoggingStyle, MileageService};

/// Open (or create) the database
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    Database::new(path_str).context("Failed to open database")
}

/// Load config from an explicit file, the data dir override, or defaults
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    Config::load_from(config_path).context("Failed to load config")
}

/// The `--style` override if given, else the saved style (or config default)
pub fn parse_style(db: &Database, config: &Config, style: Option<&str>) -> Result<LoggingStyle> {
    match style {
        Some(s) => s.parse().map_err(|e: String| {
            anyhow::anyhow!("{} (valid styles: odometer, trip_distance)", e)
        }),
        None => Ok(MileageService::new(db, config).active_style()?),
    }
}

pub fn cmd_init(db_path: &Path, config: &Config) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let style = MileageService::new(&db, config).active_style()?;

    println!("   Logging style: {}", style.value_label());
    println!("   Distance unit: {}", config.distance_unit);
    match config.mileage_rate {
        Some(rate) => println!("   Mileage rate: {} per {}", rate, config.distance_unit),
        None => println!("   Mileage rate: not set"),
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a vehicle: tripbook vehicles add \"Work Car\" --baseline 12000");
    println!("  2. Log mileage: tripbook mileage add 1 12150 --description \"Client visit\"");
    println!("  3. Start web UI: tripbook serve");

    Ok(())
}
