//! Tripbook configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Explicit path (must exist), or the override in the data dir
//!    (~/.local/share/tripbook/config.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! `TRIPBOOK_MILEAGE_RATE` overrides the deduction rate from either layer.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::aggregate::{format_date, DEFAULT_DATE_FORMAT};
use crate::error::{Error, Result};
use crate::models::{DistanceUnit, LoggingStyle};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/tripbook.toml");

/// Environment variable overriding the mileage deduction rate
pub const MILEAGE_RATE_ENV: &str = "TRIPBOOK_MILEAGE_RATE";

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Logging style used until the user saves one
    pub default_logging_style: LoggingStyle,
    /// Label for distances
    pub distance_unit: DistanceUnit,
    /// Deduction rate per unit of business distance
    pub mileage_rate: Option<f64>,
    /// chrono format string for displaying and searching dates
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_logging_style: LoggingStyle::Odometer,
            distance_unit: DistanceUnit::Mi,
            mileage_rate: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Load from an explicit path, else the data dir override, else the
    /// embedded defaults. An explicit path must exist.
    pub fn load_from(override_path: Option<&Path>) -> Result<Self> {
        let mut config = load_config(override_path)?;
        if let Some(rate) = rate_from_env()? {
            config.mileage_rate = Some(rate);
        }
        Ok(config)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tripbook").join("config.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "Loading config override");
    fs::read_to_string(path).map_err(|e| Error::Config(format!("Failed to read config: {}", e)))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<Config> {
    let content = match override_path {
        Some(path) => read_config(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path)?,
            _ => DEFAULT_CONFIG.to_string(),
        },
    };

    parse_config(&content)
}

fn rate_from_env() -> Result<Option<f64>> {
    match std::env::var(MILEAGE_RATE_ENV) {
        Ok(value) if !value.trim().is_empty() => parse_rate(&value).map(Some),
        _ => Ok(None),
    }
}

fn parse_rate(value: &str) -> Result<f64> {
    let rate: f64 = value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("Invalid mileage rate: {}", value)))?;
    validate_rate(rate)
}

fn validate_rate(rate: f64) -> Result<f64> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(Error::Config(format!(
            "Mileage rate must be a non-negative number, got {}",
            rate
        )));
    }
    Ok(rate)
}

/// Reject strftime strings chrono cannot render for a plain date
fn validate_date_format(format: &str) -> Result<()> {
    let invalid = StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
    if invalid || format_date(NaiveDate::MIN, format).is_none() {
        return Err(Error::Config(format!("Invalid date format: {}", format)));
    }
    Ok(())
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    mileage: Option<RawMileage>,
    display: Option<RawDisplay>,
}

#[derive(Debug, Deserialize)]
struct RawMileage {
    default_logging_style: Option<String>,
    distance_unit: Option<DistanceUnit>,
    mileage_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    date_format: Option<String>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(mileage) = raw.mileage {
        if let Some(style) = mileage.default_logging_style {
            config.default_logging_style = style.parse().map_err(Error::Config)?;
        }
        if let Some(unit) = mileage.distance_unit {
            config.distance_unit = unit;
        }
        if let Some(rate) = mileage.mileage_rate {
            config.mileage_rate = Some(validate_rate(rate)?);
        }
    }

    if let Some(display) = raw.display {
        if let Some(format) = display.date_format {
            validate_date_format(&format)?;
            config.date_format = format;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.default_logging_style, LoggingStyle::Odometer);
        assert_eq!(config.distance_unit, DistanceUnit::Mi);
        assert_eq!(config.mileage_rate, None);
        assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [mileage]
            default_logging_style = "trip_distance"
            distance_unit = "km"
            mileage_rate = 0.7

            [display]
            date_format = "%d/%m/%Y"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_logging_style, LoggingStyle::TripDistance);
        assert_eq!(config.distance_unit, DistanceUnit::Km);
        assert_eq!(config.mileage_rate, Some(0.7));
        assert_eq!(config.date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(parse_config("[mileage]\ndefault_logging_style = \"gps\"").is_err());
        assert!(parse_config("[mileage]\nmileage_rate = -1.0").is_err());
        assert!(parse_config("not toml at all [").is_err());
        assert!(parse_config("[display]\ndate_format = \"%Q\"").is_err());
        assert!(parse_config("[display]\ndate_format = \"%H:%M\"").is_err());
        assert!(parse_config("[display]\ndate_format = \"%z\"").is_err());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[mileage]\ndistance_unit = \"km\"").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.distance_unit, DistanceUnit::Km);
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let result = load_config(Some(Path::new("/nonexistent/tripbook.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate(" 0.67 ").unwrap(), 0.67);
        assert!(parse_rate("abc").is_err());
        assert!(parse_rate("-0.5").is_err());
    }
}
