//! Vehicle handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState};
use tripbook_core::{NewVehicle, Vehicle};

#[derive(Debug, Deserialize)]
pub struct VehicleListQuery {
    #[serde(default)]
    pub include_archived: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVehicleRequest {
    pub name: Option<String>,
    pub baseline_odometer: Option<f64>,
}

/// GET /api/vehicles - List vehicles
pub async fn list_vehicles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VehicleListQuery>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let vehicles = state.db.list_vehicles(params.include_archived)?;
    Ok(Json(vehicles))
}

/// POST /api/vehicles - Enroll a vehicle with its baseline odometer
pub async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewVehicle>,
) -> Result<Json<Vehicle>, AppError> {
    let id = state.db.create_vehicle(&body)?;
    let vehicle = state
        .db
        .get_vehicle(id)?
        .ok_or_else(|| AppError::internal("Failed to fetch created vehicle"))?;

    info!(vehicle_id = id, baseline = body.baseline_odometer, "Created vehicle");
    Ok(Json(vehicle))
}

/// GET /api/vehicles/:id - Get a vehicle
pub async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vehicle>, AppError> {
    let vehicle = state
        .db
        .get_vehicle(id)?
        .ok_or_else(|| AppError::not_found("Vehicle not found"))?;
    Ok(Json(vehicle))
}

/// PATCH /api/vehicles/:id - Rename a vehicle or correct its baseline
pub async fn update_vehicle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateVehicleRequest>,
) -> Result<Json<Vehicle>, AppError> {
    state
        .db
        .update_vehicle(id, body.name.as_deref(), body.baseline_odometer)?;
    let vehicle = state
        .db
        .get_vehicle(id)?
        .ok_or_else(|| AppError::not_found("Vehicle not found"))?;

    info!(vehicle_id = id, "Updated vehicle");
    Ok(Json(vehicle))
}

/// POST /api/vehicles/:id/archive - Archive a vehicle
pub async fn archive_vehicle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.db.archive_vehicle(id)?;
    info!(vehicle_id = id, "Archived vehicle");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/vehicles/:id/unarchive - Unarchive a vehicle
pub async fn unarchive_vehicle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.db.unarchive_vehicle(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/vehicles/:id - Delete a vehicle and its mileage logs
pub async fn delete_vehicle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.db.delete_vehicle(id)?;
    info!(vehicle_id = id, "Deleted vehicle");
    Ok(StatusCode::NO_CONTENT)
}
