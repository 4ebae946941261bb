//! HTTP API over the measurement service
//!
//! Endpoints:
//! - `GET /healthcheck`
//! - `GET /speeds/current`
//! - `POST /speeds/run`
//! - `POST /speeds`

use crate::{
    error::{AppError, Result},
    logging::OperationLogger,
    models::{Config, SpeedTestInput},
    service::SpeedTestService,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// Shared handler state
#[derive(Clone)]
pub struct ApiState {
    service: SpeedTestService,
    ops: OperationLogger,
}

impl ApiState {
    pub fn new(service: SpeedTestService, ops: OperationLogger) -> Self {
        Self { service, ops }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

/// Error response
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

/// Maps service errors onto HTTP responses
struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            AppError::Validation { .. } | AppError::Parse(_) => StatusCode::BAD_REQUEST,
            AppError::NoData(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match &self.0 {
            AppError::Validation { .. } => "validation",
            AppError::Parse(_) => "invalid_request",
            AppError::NoData(_) => "no_data",
            AppError::NotFound(_) => "not_found",
            AppError::Storage(_) => "storage",
            _ => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: match &self.0 {
                AppError::NoData(_) => crate::output::NO_DATA_MESSAGE.to_string(),
                other => other.to_string(),
            },
            kind: self.kind(),
            field: self.0.field().map(str::to_string),
        };
        (status, Json(body)).into_response()
    }
}

/// Build the router with all endpoints
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/healthcheck", get(health_handler))
        .route("/speeds/current", get(current_handler))
        .route("/speeds/run", post(run_handler))
        .route("/speeds", post(save_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Start the API server and serve until Ctrl-C
pub async fn start_server(service: SpeedTestService, ops: OperationLogger, config: &Config) -> Result<()> {
    let addr = config.server_addr()?;
    let app = router(ApiState::new(service, ops.clone()));

    let listener = TcpListener::bind(addr).await
        .map_err(|e| AppError::server(format!("Failed to bind to {}: {}", addr, e)))?;

    ops.logger().info(&format!("Listening on http://{}", addr))
        .field("database", &config.database_path)
        .log()
        .await;
    eprintln!("Speed monitor API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::server(format!("API server error: {}", e)))?;

    ops.logger().info("Server stopped").log().await;
    Ok(())
}

async fn shutdown_signal() {
    // A failed handler install means we simply run until killed
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// GET /healthcheck
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// GET /speeds/current
async fn current_handler(State(state): State<ApiState>) -> std::result::Result<Response, ApiError> {
    let span = state.ops.start("get_current_speeds").await;
    match state.service.get_current_speeds().await {
        Ok(speeds) => {
            state.ops.completed(&span).await;
            Ok(Json(speeds).into_response())
        }
        Err(e) => {
            state.ops.failed(&span, &e).await;
            Err(e.into())
        }
    }
}

/// POST /speeds/run
async fn run_handler(State(state): State<ApiState>) -> std::result::Result<Response, ApiError> {
    let span = state.ops.start("run_speed_test").await;
    match state.service.run_speed_test().await {
        Ok(measurement) => {
            state.ops.measurement_recorded(&span, &measurement).await;
            Ok((StatusCode::CREATED, Json(measurement)).into_response())
        }
        Err(e) => {
            state.ops.failed(&span, &e).await;
            Err(e.into())
        }
    }
}

/// POST /speeds
async fn save_handler(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<SpeedTestInput>, JsonRejection>,
) -> std::result::Result<Response, ApiError> {
    let span = state.ops.start("save_speed_test").await;
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            let error = AppError::parse(format!("Invalid request body: {}", rejection.body_text()));
            state.ops.failed(&span, &error).await;
            return Err(error.into());
        }
    };

    match state.service.save_speed_test(input).await {
        Ok(measurement) => {
            state.ops.measurement_recorded(&span, &measurement).await;
            Ok((StatusCode::CREATED, Json(measurement)).into_response())
        }
        Err(e) => {
            state.ops.failed(&span, &e).await;
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(ApiError(AppError::validation("ping", "x")).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError(AppError::parse("x")).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError(AppError::no_data("x")).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError(AppError::storage("x")).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError(AppError::internal("x")).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ApiError(AppError::validation("ping", "x")).kind(), "validation");
        assert_eq!(ApiError(AppError::no_data("x")).kind(), "no_data");
        assert_eq!(ApiError(AppError::storage("x")).kind(), "storage");
    }
}
