//! Mileage log handlers
//!
//! Values in request bodies are interpreted under the user's saved logging
//! style: an odometer reading or a trip distance. Responses always carry the
//! stored absolute reading plus the derived distance.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Response, StatusCode},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState};
use tripbook_core::{
    export_ledger_string, DistanceUnit, EntryDetail, ExportFormat, LedgerFilter, LoggingStyle,
    MileageInput, MileageLogEntry, MileageService, MileageSummary, ReconciledEntry, Vehicle,
};

/// Query parameters for listing mileage logs
#[derive(Debug, Deserialize)]
pub struct MileageQuery {
    /// Free-text search over description and date
    pub search: Option<String>,
    /// Start date (YYYY-MM-DD)
    pub from: Option<String>,
    /// End date (YYYY-MM-DD)
    pub to: Option<String>,
    #[serde(default)]
    pub business_only: bool,
}

/// Query parameters for ledger export
#[derive(Debug, Deserialize)]
pub struct MileageExportQuery {
    /// Output format (default: csv)
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "csv".to_string()
}

/// Filtered ledger view; the summary always covers every entry
#[derive(Debug, Serialize)]
pub struct MileageListResponse<'a> {
    pub vehicle: &'a Vehicle,
    pub logging_style: LoggingStyle,
    pub distance_unit: DistanceUnit,
    pub entries: Vec<&'a ReconciledEntry>,
    pub summary: &'a MileageSummary,
}

fn parse_query_date(value: Option<&str>, name: &str) -> Result<Option<NaiveDate>, AppError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .map_err(|_| {
            AppError::bad_request(&format!("Invalid '{}' date format (use YYYY-MM-DD)", name))
        })
}

/// GET /api/vehicles/:id/mileage - Reconciled mileage log, most recent first
pub async fn list_mileage_logs(
    State(state): State<Arc<AppState>>,
    Path(vehicle_id): Path<i64>,
    Query(params): Query<MileageQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let from = parse_query_date(params.from.as_deref(), "from")?;
    let to = parse_query_date(params.to.as_deref(), "to")?;

    let service = MileageService::new(&state.db, &state.config);
    let style = service.active_style()?;
    let ledger = service.ledger(vehicle_id, style)?;

    let filter = LedgerFilter::new()
        .search(params.search.as_deref())
        .from(from)
        .to(to)
        .business_only(params.business_only)
        .date_format(&state.config.date_format);

    let response = MileageListResponse {
        vehicle: &ledger.vehicle,
        logging_style: style,
        distance_unit: state.config.distance_unit,
        entries: ledger.filtered(&filter),
        summary: &ledger.summary,
    };

    Ok(Json(serde_json::to_value(&response)?))
}

/// GET /api/vehicles/:id/mileage/summary - Totals over the full ledger
pub async fn get_mileage_summary(
    State(state): State<Arc<AppState>>,
    Path(vehicle_id): Path<i64>,
) -> Result<Json<MileageSummary>, AppError> {
    let service = MileageService::new(&state.db, &state.config);
    let ledger = service.ledger(vehicle_id, service.active_style()?)?;
    Ok(Json(ledger.summary))
}

/// POST /api/vehicles/:id/mileage - Create a mileage log entry
pub async fn create_mileage_log(
    State(state): State<Arc<AppState>>,
    Path(vehicle_id): Path<i64>,
    Json(body): Json<MileageInput>,
) -> Result<(StatusCode, Json<MileageLogEntry>), AppError> {
    let service = MileageService::new(&state.db, &state.config);
    let style = service.active_style()?;
    let entry = service.record(vehicle_id, style, &body)?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/mileage/:id - Entry with the value its edit form should show
pub async fn get_mileage_log(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<EntryDetail>, AppError> {
    let service = MileageService::new(&state.db, &state.config);
    let detail = service.entry_detail(id, service.active_style()?)?;
    Ok(Json(detail))
}

/// PUT /api/mileage/:id - Update a mileage log entry
pub async fn update_mileage_log(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<MileageInput>,
) -> Result<Json<MileageLogEntry>, AppError> {
    let service = MileageService::new(&state.db, &state.config);
    let style = service.active_style()?;
    let entry = service.edit(id, style, &body)?;
    Ok(Json(entry))
}

/// DELETE /api/mileage/:id - Delete a mileage log entry
pub async fn delete_mileage_log(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    MileageService::new(&state.db, &state.config).delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/vehicles/:id/mileage/export - Export the ledger to CSV or JSON
pub async fn export_mileage_logs(
    State(state): State<Arc<AppState>>,
    Path(vehicle_id): Path<i64>,
    Query(params): Query<MileageExportQuery>,
) -> Result<Response<Body>, AppError> {
    let format: ExportFormat = params
        .format
        .parse()
        .map_err(|e: String| AppError::bad_request(&e))?;

    let service = MileageService::new(&state.db, &state.config);
    let ledger = service.ledger(vehicle_id, service.active_style()?)?;
    let content = export_ledger_string(&ledger, format)?;

    info!(
        vehicle_id,
        format = format.extension(),
        entries = ledger.ledger.len(),
        "Exported mileage log"
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"mileage-{}.{}\"",
                vehicle_id,
                format.extension()
            ),
        )
        .body(Body::from(content))
        .map_err(|e| AppError::internal(&e.to_string()))
}
