//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! parsing boundary, the allocation engine, and the summary service.

use axum::Json;

use super::dto::{GenerateScheduleResponse, HealthResponse};
use super::error::AppError;
use crate::models::request::parse_request_json_str;
use crate::scheduler;
use crate::services::summary;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
///
/// Health check endpoint to verify the service is running.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
    })
}

/// POST /v1/schedules/generate
///
/// Validate and normalize the request, run the allocation engine, and
/// return the placed blocks with a per-client progress summary. Allocation
/// itself never fails; only malformed input is rejected.
pub async fn generate_schedule(
    Json(body): Json<serde_json::Value>,
) -> HandlerResult<GenerateScheduleResponse> {
    let request_json = serde_json::to_string(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request JSON: {}", e)))?;

    let request = parse_request_json_str(&request_json)
        .map_err(|e| AppError::BadRequest(format!("{:#}", e)))?;

    let blocks = scheduler::generate(&request);
    let summary = summary::summarize(&request, &blocks);

    Ok(Json(GenerateScheduleResponse { blocks, summary }))
}
