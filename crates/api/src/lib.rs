//! HTTP adaptor for the pickup point order service.
//!
//! Exposes the lifecycle use cases as JSON endpoints, with structured
//! logging (tracing) and Prometheus metrics.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::accept))
        .route("/orders/issue", post(routes::orders::issue))
        .route("/orders/{id}/cancel", post(routes::orders::cancel))
        .route(
            "/clients/{client_id}/orders",
            get(routes::orders::list_for_client),
        )
        .route(
            "/returns",
            post(routes::returns::accept).get(routes::returns::list),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
