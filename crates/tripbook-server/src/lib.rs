//! Tripbook Web Server
//!
//! Axum-based REST API for the Tripbook mileage log.
//!
//! Every request reconciles the full ledger from the database; the server
//! holds no mileage state of its own. Responses for bad input and unknown
//! ids carry a readable `error`, while store failures are logged in full and
//! reported to the client as a generic message.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use tripbook_core::{Config, Database, Error as CoreError};

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: Config,
}

/// Create the application router
pub fn create_router(db: Database, config: Config, server: ServerConfig) -> Router {
    info!(
        default_style = %config.default_logging_style,
        unit = %config.distance_unit,
        rate = ?config.mileage_rate,
        "Mileage settings loaded"
    );

    let state = Arc::new(AppState { db, config });

    let api_routes = Router::new()
        // Vehicles
        .route(
            "/vehicles",
            get(handlers::list_vehicles).post(handlers::create_vehicle),
        )
        .route(
            "/vehicles/:id",
            get(handlers::get_vehicle)
                .patch(handlers::update_vehicle)
                .delete(handlers::delete_vehicle),
        )
        .route("/vehicles/:id/archive", post(handlers::archive_vehicle))
        .route("/vehicles/:id/unarchive", post(handlers::unarchive_vehicle))
        // Mileage
        .route(
            "/vehicles/:id/mileage",
            get(handlers::list_mileage_logs).post(handlers::create_mileage_log),
        )
        .route(
            "/vehicles/:id/mileage/summary",
            get(handlers::get_mileage_summary),
        )
        .route(
            "/vehicles/:id/mileage/export",
            get(handlers::export_mileage_logs),
        )
        .route(
            "/mileage/:id",
            get(handlers::get_mileage_log)
                .put(handlers::update_mileage_log)
                .delete(handlers::delete_mileage_log),
        )
        // Settings
        .route("/settings", get(handlers::get_settings))
        .route("/settings/logging-style", put(handlers::set_logging_style))
        .with_state(state);

    // Build CORS layer
    let cors = if server.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(db: Database, config: Config, host: &str, port: u16) -> anyhow::Result<()> {
    serve_with_config(db, config, host, port, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    config: Config,
    host: &str,
    port: u16,
    server: ServerConfig,
) -> anyhow::Result<()> {
    if host != "127.0.0.1" && host != "localhost" {
        warn!("⚠️  Binding to {} - the API has no authentication", host);
    }

    let app = create_router(db, config, server);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Input and lookup failures are the client's to see
        match err.downcast_ref::<CoreError>() {
            Some(CoreError::Validation(msg)) => return Self::bad_request(msg),
            Some(CoreError::NotFound(what)) => {
                return Self::not_found(&format!("{} not found", what))
            }
            _ => {}
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
