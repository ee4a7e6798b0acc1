//! Server API tests

use super::*;
use axum::{body::Body, http::Request};
use http_body_util::BodyExt;
use tower::ServiceExt;
use tripbook_core::test_utils::{vehicle, FailingStore};
use tripbook_core::{
    LoggingStyle, MileageInput, MileageService, NewMileageLogEntry, NewVehicle,
};

fn setup_test_app(db: Database) -> Router {
    create_router(db, Config::default(), ServerConfig::default())
}

fn setup_vehicle(baseline: f64) -> (Database, i64) {
    let db = Database::in_memory().unwrap();
    let vehicle_id = db
        .create_vehicle(&NewVehicle {
            name: "Work Car".to_string(),
            baseline_odometer: baseline,
        })
        .unwrap();
    (db, vehicle_id)
}

fn add_reading(
    db: &Database,
    vehicle_id: i64,
    date: &str,
    odometer: f64,
    description: &str,
) -> i64 {
    db.create_mileage_log(&NewMileageLogEntry {
        vehicle_id,
        date: chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        odometer,
        description: Some(description.to_string()),
        is_business_use: true,
    })
    .unwrap()
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// ========== Vehicle API Tests ==========

#[tokio::test]
async fn test_list_vehicles_empty() {
    let app = setup_test_app(Database::in_memory().unwrap());

    let response = app.oneshot(get_request("/api/vehicles")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_vehicle() {
    let app = setup_test_app(Database::in_memory().unwrap());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/vehicles",
            serde_json::json!({ "name": "Honda Civic", "baseline_odometer": 42000 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["name"], "Honda Civic");
    assert_eq!(json["baseline_odometer"].as_f64().unwrap(), 42000.0);
    assert_eq!(json["archived"], false);
}

#[tokio::test]
async fn test_create_vehicle_negative_baseline() {
    let app = setup_test_app(Database::in_memory().unwrap());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/vehicles",
            serde_json::json!({ "name": "Bad", "baseline_odometer": -1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Baseline"));
}

#[tokio::test]
async fn test_get_vehicle_not_found() {
    let app = setup_test_app(Database::in_memory().unwrap());

    let response = app.oneshot(get_request("/api/vehicles/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_archive_vehicle() {
    let (db, vehicle_id) = setup_vehicle(0.0);
    let app = setup_test_app(db);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/vehicles/{}/archive", vehicle_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(get_request("/api/vehicles")).await.unwrap();
    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());

    let response = app
        .oneshot(get_request("/api/vehicles?include_archived=true"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_vehicle_baseline() {
    let (db, vehicle_id) = setup_vehicle(10_000.0);
    add_reading(&db, vehicle_id, "2024-01-01", 10_100.0, "First");
    let app = setup_test_app(db);

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/vehicles/{}", vehicle_id),
            serde_json::json!({ "baseline_odometer": 9_950 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&format!(
            "/api/vehicles/{}/mileage/summary",
            vehicle_id
        )))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["total_distance"].as_f64().unwrap(), 150.0);
}

// ========== Mileage Log API Tests ==========

#[tokio::test]
async fn test_list_mileage_logs_empty() {
    let (db, vehicle_id) = setup_vehicle(0.0);
    let app = setup_test_app(db);

    let response = app
        .oneshot(get_request(&format!("/api/vehicles/{}/mileage", vehicle_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(json["entries"].as_array().unwrap().is_empty());
    assert_eq!(json["summary"]["total_distance"].as_f64().unwrap(), 0.0);
    assert_eq!(json["logging_style"], "odometer");
}

#[tokio::test]
async fn test_list_mileage_logs_reconciled() {
    let (db, vehicle_id) = setup_vehicle(10_000.0);
    add_reading(&db, vehicle_id, "2024-01-05", 10_250.0, "Second");
    add_reading(&db, vehicle_id, "2024-01-01", 10_100.0, "First");
    let app = setup_test_app(db);

    let response = app
        .oneshot(get_request(&format!("/api/vehicles/{}/mileage", vehicle_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);

    // Most recent first
    assert_eq!(entries[0]["date"], "2024-01-05");
    assert_eq!(entries[0]["distance"].as_f64().unwrap(), 150.0);
    assert_eq!(entries[1]["date"], "2024-01-01");
    assert_eq!(entries[1]["distance"].as_f64().unwrap(), 100.0);
    assert_eq!(json["summary"]["total_distance"].as_f64().unwrap(), 250.0);
}

#[tokio::test]
async fn test_list_mileage_logs_clamps_rollback() {
    let (db, vehicle_id) = setup_vehicle(10_000.0);
    add_reading(&db, vehicle_id, "2024-01-01", 10_100.0, "First");
    add_reading(&db, vehicle_id, "2024-01-05", 10_050.0, "Typo");
    let app = setup_test_app(db);

    let response = app
        .oneshot(get_request(&format!("/api/vehicles/{}/mileage", vehicle_id)))
        .await
        .unwrap();

    let json = get_body_json(response).await;
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries[0]["distance"].as_f64().unwrap(), 0.0);
    assert_eq!(entries[0]["raw_delta"].as_f64().unwrap(), -50.0);
    assert_eq!(json["summary"]["total_distance"].as_f64().unwrap(), 100.0);
    assert_eq!(json["summary"]["rollback_count"], 1);
}

#[tokio::test]
async fn test_search_filters_entries_not_totals() {
    let (db, vehicle_id) = setup_vehicle(0.0);
    add_reading(&db, vehicle_id, "2024-03-01", 40.0, "Client meeting");
    db.create_mileage_log(&NewMileageLogEntry {
        vehicle_id,
        date: chrono::NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        odometer: 55.0,
        description: Some("Grocery run".to_string()),
        is_business_use: false,
    })
    .unwrap();
    let app = setup_test_app(db);

    let response = app
        .oneshot(get_request(&format!(
            "/api/vehicles/{}/mileage?search=client",
            vehicle_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["description"], "Client meeting");
    assert_eq!(json["summary"]["total_distance"].as_f64().unwrap(), 55.0);
    assert_eq!(json["summary"]["business_distance"].as_f64().unwrap(), 40.0);
}

#[tokio::test]
async fn test_list_mileage_logs_invalid_date_filter() {
    let (db, vehicle_id) = setup_vehicle(0.0);
    let app = setup_test_app(db);

    let response = app
        .oneshot(get_request(&format!(
            "/api/vehicles/{}/mileage?from=yesterday",
            vehicle_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_mileage_logs_unknown_vehicle() {
    let app = setup_test_app(Database::in_memory().unwrap());

    let response = app
        .oneshot(get_request("/api/vehicles/42/mileage"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_create_mileage_log() {
    let (db, vehicle_id) = setup_vehicle(50_000.0);
    let app = setup_test_app(db);

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/vehicles/{}/mileage", vehicle_id),
            serde_json::json!({
                "date": "2024-01-15",
                "value": 50120,
                "description": "Client lunch"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = get_body_json(response).await;
    assert_eq!(json["odometer"].as_f64().unwrap(), 50_120.0);
    assert_eq!(json["description"], "Client lunch");
    assert_eq!(json["is_business_use"], true);
}

#[tokio::test]
async fn test_create_mileage_log_trip_distance() {
    let (db, vehicle_id) = setup_vehicle(5_000.0);
    add_reading(&db, vehicle_id, "2024-02-01", 5_200.0, "Last");
    db.set_logging_style(LoggingStyle::TripDistance).unwrap();
    let app = setup_test_app(db.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/vehicles/{}/mileage", vehicle_id),
            serde_json::json!({ "date": "2024-02-03", "value": 30 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = get_body_json(response).await;
    assert_eq!(json["odometer"].as_f64().unwrap(), 5_230.0);

    // Persisted as the absolute reading
    let id = json["id"].as_i64().unwrap();
    assert_eq!(db.get_mileage_log(id).unwrap().unwrap().odometer, 5_230.0);
}

#[tokio::test]
async fn test_create_mileage_log_validation() {
    let (db, vehicle_id) = setup_vehicle(0.0);
    let app = setup_test_app(db.clone());

    for body in [
        serde_json::json!({ "date": "", "value": 10 }),
        serde_json::json!({ "date": "15/01/2024", "value": 10 }),
        serde_json::json!({ "date": "2024-01-15", "value": 0 }),
        serde_json::json!({ "date": "2024-01-15", "value": -10 }),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/vehicles/{}/mileage", vehicle_id),
                body,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    assert_eq!(db.count_mileage_logs(vehicle_id).unwrap(), 0);
}

#[tokio::test]
async fn test_get_mileage_log_editable_value() {
    let (db, vehicle_id) = setup_vehicle(1_000.0);
    add_reading(&db, vehicle_id, "2024-01-01", 1_100.0, "First");
    let id = add_reading(&db, vehicle_id, "2024-01-05", 1_180.0, "Second");
    db.set_logging_style(LoggingStyle::TripDistance).unwrap();
    let app = setup_test_app(db);

    let response = app
        .oneshot(get_request(&format!("/api/mileage/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["odometer"].as_f64().unwrap(), 1_180.0);
    assert_eq!(json["editable_value"].as_f64().unwrap(), 80.0);
    assert_eq!(json["logging_style"], "trip_distance");
}

#[tokio::test]
async fn test_update_mileage_log_trip_distance() {
    let (db, vehicle_id) = setup_vehicle(1_000.0);
    add_reading(&db, vehicle_id, "2024-01-01", 1_100.0, "First");
    let id = add_reading(&db, vehicle_id, "2024-01-05", 1_200.0, "Second");
    add_reading(&db, vehicle_id, "2024-01-10", 1_400.0, "Third");
    db.set_logging_style(LoggingStyle::TripDistance).unwrap();
    let app = setup_test_app(db);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/mileage/{}", id),
            serde_json::json!({ "date": "2024-01-05", "value": 50, "description": "Second" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["odometer"].as_f64().unwrap(), 1_150.0);

    let response = app
        .oneshot(get_request(&format!("/api/vehicles/{}/mileage", vehicle_id)))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let distances: Vec<f64> = json["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["distance"].as_f64().unwrap())
        .collect();
    assert_eq!(distances, vec![250.0, 50.0, 100.0]);
}

#[tokio::test]
async fn test_update_mileage_log_not_found() {
    let app = setup_test_app(Database::in_memory().unwrap());

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/mileage/999",
            serde_json::json!({ "date": "2024-01-05", "value": 50 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_mileage_log() {
    let (db, vehicle_id) = setup_vehicle(0.0);
    let id = add_reading(&db, vehicle_id, "2024-01-01", 10.0, "Only");
    let app = setup_test_app(db.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/mileage/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(db.get_mileage_log(id).unwrap().is_none());
}

#[tokio::test]
async fn test_export_mileage_csv() {
    let (db, vehicle_id) = setup_vehicle(10_000.0);
    add_reading(&db, vehicle_id, "2024-01-05", 10_250.0, "Site visit");
    add_reading(&db, vehicle_id, "2024-01-01", 10_100.0, "Client meeting");
    let app = setup_test_app(db);

    let response = app
        .oneshot(get_request(&format!(
            "/api/vehicles/{}/mileage/export?format=csv",
            vehicle_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv"
    );

    let body = get_body_text(response).await;
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "2024-01-01,Client meeting,10100.0,100.0,true,100.0");
    assert_eq!(lines[2], "2024-01-05,Site visit,10250.0,150.0,true,250.0");
}

#[tokio::test]
async fn test_export_mileage_bad_format() {
    let (db, vehicle_id) = setup_vehicle(0.0);
    let app = setup_test_app(db);

    let response = app
        .oneshot(get_request(&format!(
            "/api/vehicles/{}/mileage/export?format=xml",
            vehicle_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Settings API Tests ==========

#[tokio::test]
async fn test_settings_default_and_update() {
    let app = setup_test_app(Database::in_memory().unwrap());

    let response = app.clone().oneshot(get_request("/api/settings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["logging_style"], "odometer");
    assert_eq!(json["logging_style_saved"], false);
    assert_eq!(json["distance_unit"], "mi");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/settings/logging-style",
            serde_json::json!({ "logging_style": "trip_distance" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["logging_style"], "trip_distance");
    assert_eq!(json["logging_style_saved"], true);

    let response = app.oneshot(get_request("/api/settings")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["logging_style"], "trip_distance");
}

// ========== Error Mapping Tests ==========

fn ledger_total(store: &FailingStore) -> Result<f64, AppError> {
    let config = Config::default();
    let ledger = MileageService::new(store, &config).ledger(1, LoggingStyle::Odometer)?;
    Ok(ledger.summary.total_distance)
}

fn record_reading(store: &FailingStore) -> Result<i64, AppError> {
    let config = Config::default();
    let entry = MileageService::new(store, &config).record(
        1,
        LoggingStyle::Odometer,
        &MileageInput::new("2024-01-20", 10_300.0),
    )?;
    Ok(entry.id)
}

#[tokio::test]
async fn test_store_failure_is_generic_500() {
    let response = ledger_total(&FailingStore::failing_reads())
        .unwrap_err()
        .into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "An internal error occurred");

    let store = FailingStore::failing_writes(vehicle(1, 10_000.0), vec![]);
    let response = record_reading(&store).unwrap_err().into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = get_body_json(response).await;
    assert!(!json["error"].as_str().unwrap().contains("simulated"));
}

#[tokio::test]
async fn test_store_validation_still_maps_to_400() {
    let response = AppError::from(CoreError::Validation("Date is required".to_string()))
        .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
