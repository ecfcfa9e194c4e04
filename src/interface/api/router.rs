//! API Router configuration

use super::metrics_handler::metrics_handler;
use super::signaling_handler::{
    add_candidate, answer_call, end_call, get_active_call, get_candidates, get_session_call,
    health_check, initiate_call, AppState,
};
use super::ws_handler::ws_handler;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the API router
pub fn build_router(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    // Health check route (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    // Call signaling routes
    let call_routes = Router::new()
        .route("/calls", post(initiate_call))
        .route("/calls/active", get(get_active_call))
        .route("/calls/:call_id/answer", post(answer_call))
        .route("/calls/:call_id/candidates", post(add_candidate))
        .route("/calls/:call_id/candidates/:side", get(get_candidates))
        .route("/calls/:call_id/end", post(end_call));

    // Scheduled-session lookup route
    let session_routes = Router::new().route("/sessions/:session_id/call", get(get_session_call));

    // WebSocket event stream
    let ws_routes = Router::new().route("/ws", get(ws_handler));

    // Metrics route (separate state)
    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    Router::new()
        .merge(health_routes)
        .merge(call_routes)
        .merge(session_routes)
        .merge(ws_routes)
        .with_state(state)
        .merge(metrics_routes)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
