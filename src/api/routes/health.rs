use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::timing::format_time_remaining;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Deserialize)]
pub struct FormatParams {
    pub seconds: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct FormatResponse {
    pub seconds: u64,
    pub formatted: String,
}

/// Render a second count the same way countdowns are shown.
pub async fn format_seconds(
    Query(params): Query<FormatParams>,
) -> Result<Json<FormatResponse>, ApiError> {
    let seconds = params
        .seconds
        .ok_or_else(|| ApiError::BadRequest("Missing `seconds` parameter".to_string()))?;
    let seconds = u64::try_from(seconds)
        .map_err(|_| ApiError::BadRequest("`seconds` must not be negative".to_string()))?;

    Ok(Json(FormatResponse {
        seconds,
        formatted: format_time_remaining(seconds),
    }))
}
