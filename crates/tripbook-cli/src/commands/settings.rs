//! Settings command implementations

use anyhow::Result;
use tripbook_core::{Config, Database, LoggingStyle};

use super::parse_style;

/// Show current settings
pub fn cmd_settings_show(db: &Database, config: &Config) -> Result<()> {
    let saved = db.get_logging_style()?;
    let style = saved.unwrap_or(config.default_logging_style);

    println!();
    println!("⚙️  Settings");
    println!("   ─────────────────────────────");
    println!(
        "   Logging style: {}{}",
        style,
        if saved.is_none() { " (default)" } else { "" }
    );
    println!("   Distance unit: {}", config.distance_unit);
    match config.mileage_rate {
        Some(rate) => println!("   Mileage rate:  {} per {}", rate, config.distance_unit),
        None => println!("   Mileage rate:  not set"),
    }
    println!("   Date format:   {}", config.date_format);

    Ok(())
}

/// Save the logging style
pub fn cmd_settings_style(db: &Database, config: &Config, style: &str) -> Result<LoggingStyle> {
    let style = parse_style(db, config, Some(style))?;
    db.set_logging_style(style)?;

    println!("✅ Logging style set to {}", style);
    match style {
        LoggingStyle::Odometer => println!("   Enter the odometer reading for each entry"),
        LoggingStyle::TripDistance => println!("   Enter the distance driven for each entry"),
    }
    Ok(style)
}
