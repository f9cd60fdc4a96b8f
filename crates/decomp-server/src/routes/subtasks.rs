//! Subtask generation route.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use decomp_core::SubtaskPlan;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info_span, Instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Create subtasks router
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/generate-subtasks", post(generate_subtasks))
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub plan: SubtaskPlan,
    pub count: usize,
}

impl From<SubtaskPlan> for GenerateResponse {
    fn from(plan: SubtaskPlan) -> Self {
        let count = plan.subtasks.len();
        Self { plan, count }
    }
}

/// Decompose a task description into subtasks
pub async fn generate_subtasks(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload?;
    if request.description.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            "description must not be empty".to_string(),
        ));
    }

    let _in_flight = state.track_request();
    let request_id = uuid::Uuid::new_v4();
    let span = info_span!("generate", %request_id, chars = request.description.len());

    let plan = state
        .engine
        .generate_subtasks(&request.description)
        .instrument(span)
        .await?;

    Ok(Json(plan.into()))
}
