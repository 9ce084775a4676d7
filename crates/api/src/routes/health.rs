use axum::{extract::State, routing::get, Json, Router};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use crate::ApiState;

/// Liveness plus the business calendar the server is running on, so a
/// misconfigured `BUSINESS_TIMEZONE` is visible from outside.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    success: bool,
    status: &'static str,
    timezone: &'static str,
    business_date: NaiveDate,
}

#[derive(Serialize)]
struct VersionResponse {
    success: bool,
    version: &'static str,
}

async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "ok",
        timezone: state.time.timezone().name(),
        business_date: state.time.today(),
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        success: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
}
