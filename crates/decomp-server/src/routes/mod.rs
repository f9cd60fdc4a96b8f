//! API route modules.

pub mod health;
pub mod subtasks;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(subtasks::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
