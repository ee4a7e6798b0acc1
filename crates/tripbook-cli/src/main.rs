//! Tripbook CLI - Vehicle mileage log
//!
//! Usage:
//!   tripbook init                              Initialize database
//!   tripbook vehicles add "Work Car" --baseline 12000
//!   tripbook mileage add 1 12150               Log a reading (or trip distance)
//!   tripbook mileage list 1 --search client    Reconciled log, most recent first
//!   tripbook serve --port 3000                 Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, &config),
        Commands::Vehicles { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_vehicles_list(&db, false),
                Some(VehiclesAction::List { all }) => commands::cmd_vehicles_list(&db, all),
                Some(VehiclesAction::Add { name, baseline }) => {
                    commands::cmd_vehicles_add(&db, &name, baseline).map(|_| ())
                }
                Some(VehiclesAction::Show { id }) => commands::cmd_vehicles_show(&db, &config, id),
                Some(VehiclesAction::Update { id, name, baseline }) => {
                    commands::cmd_vehicles_update(&db, id, name.as_deref(), baseline)
                }
                Some(VehiclesAction::Archive { id }) => commands::cmd_vehicles_archive(&db, id),
                Some(VehiclesAction::Unarchive { id }) => {
                    commands::cmd_vehicles_unarchive(&db, id)
                }
                Some(VehiclesAction::Delete { id }) => commands::cmd_vehicles_delete(&db, id),
            }
        }
        Commands::Mileage { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                MileageAction::List {
                    vehicle,
                    search,
                    from,
                    to,
                    business_only,
                    style,
                } => commands::cmd_mileage_list(
                    &db,
                    &config,
                    vehicle,
                    &commands::ListOptions {
                        search: search.as_deref(),
                        from: from.as_deref(),
                        to: to.as_deref(),
                        business_only,
                        style: style.as_deref(),
                    },
                ),
                MileageAction::Add {
                    vehicle,
                    value,
                    date,
                    description,
                    personal,
                    style,
                } => commands::cmd_mileage_add(
                    &db,
                    &config,
                    vehicle,
                    value,
                    &commands::AddOptions {
                        date: date.as_deref(),
                        description: description.as_deref(),
                        personal,
                        style: style.as_deref(),
                    },
                )
                .map(|_| ()),
                MileageAction::Edit {
                    id,
                    value,
                    date,
                    description,
                    personal,
                    business,
                    style,
                } => {
                    let business = match (personal, business) {
                        (true, _) => Some(false),
                        (_, true) => Some(true),
                        _ => None,
                    };
                    commands::cmd_mileage_edit(
                        &db,
                        &config,
                        id,
                        &commands::EditOptions {
                            value,
                            date: date.as_deref(),
                            description: description.as_deref(),
                            business,
                            style: style.as_deref(),
                        },
                    )
                    .map(|_| ())
                }
                MileageAction::Delete { id } => commands::cmd_mileage_delete(&db, &config, id),
                MileageAction::Summary { vehicle } => {
                    commands::cmd_mileage_summary(&db, &config, vehicle)
                }
                MileageAction::Export {
                    vehicle,
                    format,
                    output,
                } => {
                    commands::cmd_mileage_export(&db, &config, vehicle, &format, output.as_deref())
                }
            }
        }
        Commands::Settings { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(SettingsAction::Show) => commands::cmd_settings_show(&db, &config),
                Some(SettingsAction::Style { style }) => {
                    commands::cmd_settings_style(&db, &config, &style).map(|_| ())
                }
            }
        }
        Commands::Serve {
            port,
            host,
            allowed_origins,
        } => {
            commands::cmd_serve(&cli.db, config, &host, port, allowed_origins.as_deref()).await
        }
    }
}
