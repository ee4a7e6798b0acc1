//! Settings handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState};
use tripbook_core::{DistanceUnit, LoggingStyle, MileageService};

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    /// Style new input is interpreted under
    pub logging_style: LoggingStyle,
    /// Whether `logging_style` was saved by the user or comes from config
    pub logging_style_saved: bool,
    pub distance_unit: DistanceUnit,
    pub mileage_rate: Option<f64>,
    pub date_format: String,
}

#[derive(Debug, Deserialize)]
pub struct SetLoggingStyleRequest {
    pub logging_style: LoggingStyle,
}

/// GET /api/settings - Active mileage settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SettingsResponse>, AppError> {
    let saved = state.db.get_logging_style()?;
    let style = MileageService::new(&state.db, &state.config).active_style()?;

    Ok(Json(SettingsResponse {
        logging_style: style,
        logging_style_saved: saved.is_some(),
        distance_unit: state.config.distance_unit,
        mileage_rate: state.config.mileage_rate,
        date_format: state.config.date_format.clone(),
    }))
}

/// PUT /api/settings/logging-style - Save the logging style
pub async fn set_logging_style(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetLoggingStyleRequest>,
) -> Result<Json<SettingsResponse>, AppError> {
    state.db.set_logging_style(body.logging_style)?;
    info!(style = %body.logging_style, "Logging style changed");
    get_settings(State(state)).await
}
