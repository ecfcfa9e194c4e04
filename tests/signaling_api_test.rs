//! Signaling API Integration Tests

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use parley::application::SignalingCoordinator;
use parley::infrastructure::persistence::InMemoryCallStore;
use parley::interface::api::{build_router, init_metrics, AppState, PRINCIPAL_HEADER};
use serde_json::{json, Value};
use std::sync::Arc;
use std::sync::OnceLock;
use tower::ServiceExt; // For `oneshot`

/// The Prometheus recorder is process-global; install it once per test binary
fn prometheus() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE.get_or_init(init_metrics).clone()
}

fn test_app() -> Router {
    let store = Arc::new(InMemoryCallStore::new());
    let coordinator = Arc::new(SignalingCoordinator::new(store));
    build_router(AppState { coordinator }, prometheus())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    principal: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(principal) = principal {
        builder = builder.header(PRINCIPAL_HEADER, principal);
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn initiate(app: &Router, caller: &str, callee: &str, offer: &str) -> u64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/calls",
        Some(caller),
        Some(json!({ "callee": callee, "offer": offer })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    body["data"]["call_id"].as_u64().unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "ok");
}

#[tokio::test]
async fn test_missing_principal_header_is_unauthorized() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/calls/active", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_full_negotiation_scenario() {
    let app = test_app();

    // C initiates with offer O1
    let call_id = initiate(&app, "C", "D", "O1").await;

    // D polls and discovers the call
    let (status, body) = send(&app, Method::GET, "/calls/active", Some("D"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"].as_u64().unwrap(), call_id);
    assert_eq!(body["data"]["status"], "initiated");
    assert_eq!(body["data"]["offer"], "O1");
    assert_eq!(body["data"]["answer"], Value::Null);

    // D answers
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/calls/{}/answer", call_id),
        Some("D"),
        Some(json!({ "answer": "A1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // C polls and sees the answer
    let (status, body) = send(&app, Method::GET, "/calls/active", Some("C"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "answered");
    assert_eq!(body["data"]["answer"], "A1");

    // Both sides push candidates
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/calls/{}/candidates", call_id),
        Some("C"),
        Some(json!({ "candidate": "ice-c1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["side"], "caller");

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/calls/{}/candidates", call_id),
        Some("D"),
        Some(json!({ "candidate": "ice-d1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Each side drains the other side's list
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/calls/{}/candidates/caller", call_id),
        Some("D"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["candidates"], json!(["ice-c1"]));

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/calls/{}/candidates/callee", call_id),
        Some("C"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["candidates"], json!(["ice-d1"]));

    // Candidate history also rides along on the polled snapshot
    let (_, body) = send(&app, Method::GET, "/calls/active", Some("D"), None).await;
    assert_eq!(body["data"]["caller_candidates"], json!(["ice-c1"]));
    assert_eq!(body["data"]["callee_candidates"], json!(["ice-d1"]));

    // Either party ends; both observe no active call within the next poll
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/calls/{}/end", call_id),
        Some("C"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for principal in ["C", "D"] {
        let (status, body) = send(&app, Method::GET, "/calls/active", Some(principal), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], Value::Null);
    }
}

#[tokio::test]
async fn test_self_call_is_bad_request() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/calls",
        Some("C"),
        Some(json!({ "callee": "C", "offer": "O1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_second_initiate_conflicts() {
    let app = test_app();
    initiate(&app, "C", "D", "O1").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/calls",
        Some("C"),
        Some(json!({ "callee": "E", "offer": "O2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // the callee is busy too
    let (status, _) = send(
        &app,
        Method::POST,
        "/calls",
        Some("E"),
        Some(json!({ "callee": "D", "offer": "O3" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_answer_guards() {
    let app = test_app();
    let call_id = initiate(&app, "C", "D", "O1").await;

    // the caller cannot answer its own call
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/calls/{}/answer", call_id),
        Some("C"),
        Some(json!({ "answer": "A1" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // a bystander cannot either
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/calls/{}/answer", call_id),
        Some("M"),
        Some(json!({ "answer": "A1" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/calls/{}/answer", call_id),
        Some("D"),
        Some(json!({ "answer": "A1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // answering twice is rejected and the first answer survives
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/calls/{}/answer", call_id),
        Some("D"),
        Some(json!({ "answer": "A2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, Method::GET, "/calls/active", Some("C"), None).await;
    assert_eq!(body["data"]["answer"], "A1");
}

#[tokio::test]
async fn test_operations_after_end_are_not_found() {
    let app = test_app();
    let call_id = initiate(&app, "C", "D", "O1").await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/calls/{}/end", call_id),
        Some("D"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/calls/{}/end", call_id),
        Some("C"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/calls/{}/answer", call_id),
        Some("D"),
        Some(json!({ "answer": "A1" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/calls/{}/candidates", call_id),
        Some("C"),
        Some(json!({ "candidate": "ice-late" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_candidate_guards() {
    let app = test_app();
    let call_id = initiate(&app, "C", "D", "O1").await;

    // candidates are legal before the answer exists
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/calls/{}/candidates", call_id),
        Some("C"),
        Some(json!({ "candidate": "ice-early" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // a bystander cannot append
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/calls/{}/candidates", call_id),
        Some("M"),
        Some(json!({ "candidate": "ice-evil" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // unknown side name on the view endpoint
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/calls/{}/candidates/observer", call_id),
        Some("C"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // unknown call id
    let (status, _) = send(
        &app,
        Method::POST,
        "/calls/9999/candidates",
        Some("C"),
        Some(json!({ "candidate": "ice" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_candidate_order_is_preserved_per_side() {
    let app = test_app();
    let call_id = initiate(&app, "C", "D", "O1").await;

    for candidate in ["c1", "c2", "c3"] {
        send(
            &app,
            Method::POST,
            &format!("/calls/{}/candidates", call_id),
            Some("C"),
            Some(json!({ "candidate": candidate })),
        )
        .await;
    }
    for candidate in ["d1", "d2"] {
        send(
            &app,
            Method::POST,
            &format!("/calls/{}/candidates", call_id),
            Some("D"),
            Some(json!({ "candidate": candidate })),
        )
        .await;
    }

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/calls/{}/candidates/caller", call_id),
        Some("D"),
        None,
    )
    .await;
    assert_eq!(body["data"]["candidates"], json!(["c1", "c2", "c3"]));

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/calls/{}/candidates/callee", call_id),
        Some("C"),
        None,
    )
    .await;
    assert_eq!(body["data"]["candidates"], json!(["d1", "d2"]));
}

#[tokio::test]
async fn test_scheduled_session_lookup() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/calls",
        Some("host"),
        Some(json!({ "callee": "guest", "offer": "O1", "session_id": 42 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let call_id = body["data"]["call_id"].as_u64().unwrap();

    // the joined participant resolves the call through the session binding
    let (status, body) = send(&app, Method::GET, "/sessions/42/call", Some("guest"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"].as_u64().unwrap(), call_id);

    // a stranger cannot
    let (status, _) = send(&app, Method::GET, "/sessions/42/call", Some("M"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // an unbound session is simply empty
    let (status, body) = send(&app, Method::GET, "/sessions/77/call", Some("guest"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Null);

    // teardown unbinds the session
    send(
        &app,
        Method::POST,
        &format!("/calls/{}/end", call_id),
        Some("host"),
        None,
    )
    .await;
    let (status, body) = send(&app, Method::GET, "/sessions/42/call", Some("guest"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn test_metrics_endpoint_renders() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
