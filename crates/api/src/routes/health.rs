//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use common::Id;
use serde::Serialize;

use crate::routes::orders::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub pickup_point_id: Id,
}

/// GET /health — liveness and the pickup point being served.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        pickup_point_id: state.service.pickup_point_id(),
    })
}
