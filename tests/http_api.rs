//! HTTP API tests
//!
//! Drive the router in-process with `tower::ServiceExt::oneshot`; no socket
//! is opened.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use speed_monitor::{
    logging::OperationLogger,
    models::Config,
    producer::FixedProducer,
    server::{router, ApiState},
    service::SpeedTestService,
    store::{MeasurementStore, SqliteStore},
};
use std::sync::Arc;
use tower::ServiceExt;

fn test_service() -> SpeedTestService {
    SpeedTestService::new(
        Arc::new(SqliteStore::open_in_memory().unwrap()),
        Arc::new(FixedProducer::new(30.754, 6.5, 12.25)),
    )
}

fn test_router(service: SpeedTestService) -> Router {
    router(ApiState::new(service, OperationLogger::new(&Config::default())))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_healthcheck() {
    let (status, body) = send(test_router(test_service()), Method::GET, "/healthcheck", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_current_without_data_is_404() {
    let (status, body) = send(test_router(test_service()), Method::GET, "/speeds/current", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "no_data");
    assert_eq!(body["error"], "No speed data available");
}

#[tokio::test]
async fn test_run_creates_measurement() {
    let service = test_service();

    let (status, body) = send(test_router(service.clone()), Method::POST, "/speeds/run", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["download_speed"], 30.75);
    assert_eq!(body["upload_speed"], 6.5);
    assert_eq!(body["ping"], 12.25);

    let (status, current) = send(test_router(service), Method::GET, "/speeds/current", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["download_speed"], 30.75);
    assert_eq!(current["last_updated"], body["timestamp"]);
}

#[tokio::test]
async fn test_save_valid_input() {
    let service = test_service();
    let input = json!({ "download_speed": 123.456, "upload_speed": 67.89, "ping": 0 });

    let (status, body) = send(test_router(service.clone()), Method::POST, "/speeds", Some(input)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["download_speed"], 123.46);
    assert_eq!(body["upload_speed"], 67.89);
    assert_eq!(body["ping"], 0.0);
    assert_eq!(service.store().count().unwrap(), 1);
}

#[tokio::test]
async fn test_save_invalid_input_is_400() {
    let service = test_service();

    for (input, field) in [
        (json!({ "download_speed": 0, "upload_speed": 1, "ping": 1 }), "download_speed"),
        (json!({ "download_speed": 1, "upload_speed": -1, "ping": 1 }), "upload_speed"),
        (json!({ "download_speed": 1, "upload_speed": 1, "ping": -0.01 }), "ping"),
    ] {
        let (status, body) = send(test_router(service.clone()), Method::POST, "/speeds", Some(input)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
        assert_eq!(body["field"], field);
    }

    assert_eq!(service.store().count().unwrap(), 0);
}

#[tokio::test]
async fn test_save_malformed_body_is_400() {
    let service = test_service();
    let input = json!({ "download_speed": "fast" });

    let (status, body) = send(test_router(service.clone()), Method::POST, "/speeds", Some(input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_request");
    assert_eq!(service.store().count().unwrap(), 0);
}

#[tokio::test]
async fn test_cors_headers_present() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/healthcheck")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = test_router(test_service()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _) = send(test_router(test_service()), Method::GET, "/speeds/history", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
