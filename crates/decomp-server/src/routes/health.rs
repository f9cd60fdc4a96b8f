//! Health check endpoint.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use decomp_core::EngineInfo;
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub started_at: DateTime<Utc>,
    pub components: EngineInfo,
    pub metrics: HealthMetrics,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    pub pending_requests: usize,
}

/// Health check endpoint
///
/// The server only starts once the engine is built, so a reachable server
/// is always healthy.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        started_at: state.started_at,
        components: state.engine.info(),
        metrics: HealthMetrics {
            pending_requests: state.pending_requests(),
        },
    })
}
