use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AppState;
use crate::constants::API_VERSION;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub api_version: String,
    pub environment: String,
    pub frame_url: String,
    pub timestamp: DateTime<Utc>,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        api_version: API_VERSION.to_string(),
        environment: state.config.environment.clone(),
        frame_url: state.config.frame_url(),
        timestamp: Utc::now(),
    })
}
