//! Prometheus metrics handler

use crate::domain::call::value_object::CandidateSide;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics exporter
pub fn init_metrics() -> PrometheusHandle {
    let handle = PrometheusBuilder::new().install_recorder().unwrap();

    // Describe metrics
    describe_gauge!(
        "signaling_active_calls",
        "Number of currently active calls"
    );
    describe_counter!(
        "signaling_calls_initiated_total",
        "Total number of calls initiated"
    );
    describe_counter!(
        "signaling_calls_answered_total",
        "Total number of calls answered"
    );
    describe_counter!(
        "signaling_calls_ended_total",
        "Total number of calls ended"
    );
    describe_counter!(
        "signaling_candidates_total",
        "Total number of connectivity candidates appended"
    );

    handle
}

/// HTTP metrics handler
pub async fn metrics_handler(
    axum::extract::State(prometheus_handle): axum::extract::State<PrometheusHandle>,
) -> Response {
    let metrics = prometheus_handle.render();
    (StatusCode::OK, metrics).into_response()
}

/// Update active calls gauge
pub fn update_active_calls(count: usize) {
    gauge!("signaling_active_calls").set(count as f64);
}

/// Record a call initiation
pub fn record_call_initiated() {
    counter!("signaling_calls_initiated_total").increment(1);
}

/// Record a call answer
pub fn record_call_answered() {
    counter!("signaling_calls_answered_total").increment(1);
}

/// Record a call teardown
pub fn record_call_ended() {
    counter!("signaling_calls_ended_total").increment(1);
}

/// Record a candidate append
pub fn record_candidate_added(side: CandidateSide) {
    counter!("signaling_candidates_total", "side" => side.as_str().to_string()).increment(1);
}
