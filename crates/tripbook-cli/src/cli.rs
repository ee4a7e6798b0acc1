//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tripbook - Vehicle mileage log for tax and expense reporting
#[derive(Parser)]
#[command(name = "tripbook")]
#[command(about = "Self-hosted vehicle mileage log", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tripbook.db", global = true)]
    pub db: PathBuf,

    /// Config file (defaults to ~/.local/share/tripbook/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Manage vehicles (list, add, show, archive)
    Vehicles {
        #[command(subcommand)]
        action: Option<VehiclesAction>,
    },

    /// Record and review mileage
    Mileage {
        #[command(subcommand)]
        action: MileageAction,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origins (comma-separated)
        #[arg(long)]
        allowed_origins: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum VehiclesAction {
    /// List vehicles
    List {
        /// Include archived vehicles
        #[arg(long)]
        all: bool,
    },

    /// Enroll a vehicle
    Add {
        /// Vehicle name
        name: String,
        /// Odometer reading at enrollment
        #[arg(long, default_value = "0")]
        baseline: f64,
    },

    /// Show a vehicle with its mileage totals
    Show {
        /// Vehicle ID
        id: i64,
    },

    /// Rename a vehicle or correct its baseline
    Update {
        /// Vehicle ID
        id: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New baseline odometer reading
        #[arg(long)]
        baseline: Option<f64>,
    },

    /// Archive a vehicle (hides it, keeps its log)
    Archive {
        /// Vehicle ID
        id: i64,
    },

    /// Unarchive a vehicle
    Unarchive {
        /// Vehicle ID
        id: i64,
    },

    /// Delete a vehicle and its whole mileage log
    Delete {
        /// Vehicle ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum MileageAction {
    /// Show the reconciled log, most recent first
    List {
        /// Vehicle ID
        vehicle: i64,
        /// Search descriptions and dates
        #[arg(short, long)]
        search: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Only business-use entries
        #[arg(long)]
        business_only: bool,
        /// Logging style for displayed values (defaults to the saved style)
        #[arg(long)]
        style: Option<String>,
    },

    /// Record an entry
    Add {
        /// Vehicle ID
        vehicle: i64,
        /// Odometer reading or trip distance, depending on logging style
        value: f64,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Trip description
        #[arg(long)]
        description: Option<String>,
        /// Mark as personal (non-business) use
        #[arg(long)]
        personal: bool,
        /// Interpret value as: odometer, trip_distance (defaults to the saved style)
        #[arg(long)]
        style: Option<String>,
    },

    /// Edit an entry (unset fields keep their current values)
    Edit {
        /// Entry ID
        id: i64,
        /// New odometer reading or trip distance
        #[arg(long)]
        value: Option<f64>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// Mark as personal use
        #[arg(long, conflicts_with = "business")]
        personal: bool,
        /// Mark as business use
        #[arg(long)]
        business: bool,
        /// Interpret value as: odometer, trip_distance (defaults to the saved style)
        #[arg(long)]
        style: Option<String>,
    },

    /// Delete an entry
    Delete {
        /// Entry ID
        id: i64,
    },

    /// Show totals for a vehicle
    Summary {
        /// Vehicle ID
        vehicle: i64,
    },

    /// Export the reconciled log
    Export {
        /// Vehicle ID
        vehicle: i64,
        /// Output format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show current settings
    Show,

    /// Set the logging style: odometer, trip_distance
    Style {
        /// Logging style
        style: String,
    },
}
