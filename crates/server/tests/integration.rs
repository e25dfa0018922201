//! Integration tests for the readmission server.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`;
//! nothing binds a TCP port.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value as JsonValue, json};
use tower::ServiceExt;

use readmit_server::config::Config;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build the app router with test configuration.
fn test_app() -> Router {
    let config = Config {
        bind_address: "0.0.0.0:0".to_string(),
        cors_origins: vec!["*".to_string()],
        rate_limit_rps: 1000,
        max_bundle_bytes: 64 * 1024,
    };
    readmit_server::build_app(&config)
}

/// Send a request to the app and return (status, body as JSON).
async fn request(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let response = app.clone().oneshot(req).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();

    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };

    (status, body)
}

/// Build a POST request with a raw body.
fn post_raw(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(body.into())
        .unwrap()
}

/// Build a POST request with JSON body.
fn post(uri: &str, body: JsonValue) -> Request<Body> {
    post_raw(uri, serde_json::to_vec(&body).unwrap())
}

fn encounter_entry(start: &str, end: Option<&str>, class: &str) -> JsonValue {
    let mut period = json!({ "start": start });
    if let Some(end) = end {
        period["end"] = json!(end);
    }
    json!({
        "resource": {
            "resourceType": "Encounter",
            "class": { "code": class },
            "period": period
        }
    })
}

/// Sample bundle: one readmission, one outpatient visit, one condition.
fn sample_bundle() -> JsonValue {
    json!({
        "resourceType": "Bundle",
        "type": "collection",
        "entry": [
            {"resource": {"resourceType": "Patient", "id": "pat-1", "gender": "male", "birthDate": "1955-08-20"}},
            encounter_entry("2024-01-01", Some("2024-01-05"), "IMP"),
            encounter_entry("2024-01-10", None, "AMB"),
            encounter_entry("2024-01-20", None, "EMER"),
            {"resource": {"resourceType": "Condition", "code": {"text": "Heart failure"}, "onsetDateTime": "2020-02-02"}}
        ]
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health() {
    let app = test_app();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = request(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_extract_features() {
    let app = test_app();

    let (status, body) = request(&app, post("/fhir/Bundle/$extract-features", sample_bundle())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient"]["patientId"], "pat-1");
    assert_eq!(body["patient"]["encounters"].as_array().unwrap().len(), 3);
    assert_eq!(body["patient"]["conditions"][0]["name"], "Heart failure");

    let discharges = body["features"]["discharges"].as_array().unwrap();
    assert_eq!(discharges.len(), 2);
    assert_eq!(discharges[0]["dischargeDate"], "2024-01-05");
    assert_eq!(discharges[0]["isReadmittedWithin30Days"], true);
    assert_eq!(discharges[1]["encounterType"], "EMER");
    assert_eq!(discharges[1]["isReadmittedWithin30Days"], false);
    assert_eq!(body["features"]["readmissionCount"], 1);
    assert_eq!(body["features"]["ageAtLastDischarge"], 68);
}

#[tokio::test]
async fn test_extract_features_malformed_json() {
    let app = test_app();

    let (status, body) = request(
        &app,
        post_raw("/fhir/Bundle/$extract-features", r#"{"entry": [ "#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["resourceType"], "OperationOutcome");
    assert_eq!(body["issue"][0]["code"], "structure");
}

#[tokio::test]
async fn test_extract_features_invalid_timestamp() {
    let app = test_app();

    let bundle = json!({
        "entry": [encounter_entry("2024-01-01", Some("next tuesday"), "IMP")]
    });
    let (status, body) = request(&app, post("/fhir/Bundle/$extract-features", bundle)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["issue"][0]["code"], "value");
    assert!(
        body["issue"][0]["diagnostics"]
            .as_str()
            .unwrap()
            .contains("next tuesday")
    );
}

#[tokio::test]
async fn test_extract_features_empty_document() {
    let app = test_app();

    let (status, body) = request(&app, post("/fhir/Bundle/$extract-features", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient"]["patientId"], JsonValue::Null);
    assert_eq!(body["features"]["encounterCount"], 0);
}

#[tokio::test]
async fn test_label_readmissions() {
    let app = test_app();

    let encounters = json!([
        {"start": "2024-01-01", "end": "2024-01-05", "classCode": "IMP"},
        {"start": "2024-03-01", "classCode": "inpatient"},
        {"start": "2024-01-10", "end": "2024-01-10"}
    ]);
    let (status, body) = request(&app, post("/fhir/Encounter/$label-readmissions", encounters)).await;

    assert_eq!(status, StatusCode::OK);
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["isReadmittedWithin30Days"], false);
    assert_eq!(events[1]["dischargeDate"], "2024-03-01");
}

#[tokio::test]
async fn test_label_readmissions_rejects_non_list() {
    let app = test_app();

    let (status, body) = request(
        &app,
        post("/fhir/Encounter/$label-readmissions", json!({"start": "2024-01-01"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["resourceType"], "OperationOutcome");
}

#[tokio::test]
async fn test_request_id_echoed() {
    let app = test_app();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .header("X-Request-ID", "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.headers().get("X-Request-ID").unwrap(), "abc-123");
}

#[tokio::test]
async fn test_oversized_bundle_rejected() {
    let app = test_app();

    let padding = "x".repeat(128 * 1024);
    let bundle = json!({ "entry": [], "padding": padding });
    let response = app
        .oneshot(post("/fhir/Bundle/$extract-features", bundle))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = test_app();

    request(&app, post("/fhir/Bundle/$extract-features", sample_bundle())).await;

    let req = Request::builder()
        .method("GET")
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("bundles_parsed_total"));
}
