//! Signaling API handlers

use super::dto::{
    AddCandidateRequest, AddCandidateResponse, AnswerCallRequest, ApiResponse,
    CandidateViewResponse, InitiateCallRequest, InitiateCallResponse,
};
use super::identity::AuthenticatedPrincipal;
use super::metrics_handler::{
    record_call_answered, record_call_ended, record_call_initiated, record_candidate_added,
};
use crate::application::read_model::CallSnapshot;
use crate::application::signaling::SignalingCoordinator;
use crate::domain::call::value_object::CandidateSide;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::value_objects::{CallId, PrincipalId, SessionId};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{error, info};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<SignalingCoordinator>,
}

/// Map a domain error onto the HTTP surface
fn domain_error_response<T>(err: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = match &err {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Unauthorized(_) => StatusCode::FORBIDDEN,
        DomainError::SelfCallNotAllowed => StatusCode::BAD_REQUEST,
        DomainError::InvalidTransition(_)
        | DomainError::AlreadyInCall(_)
        | DomainError::AlreadyAnswered
        | DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(ApiResponse::error(err.to_string())))
}

/// Health check
pub async fn health_check() -> Json<ApiResponse<String>> {
    Json(ApiResponse::success("ok".to_string()))
}

/// Initiate a call
pub async fn initiate_call(
    State(state): State<AppState>,
    AuthenticatedPrincipal(caller): AuthenticatedPrincipal,
    Json(req): Json<InitiateCallRequest>,
) -> (StatusCode, Json<ApiResponse<InitiateCallResponse>>) {
    info!("API: {} initiating call to {}", caller, req.callee);

    let callee = PrincipalId::new(req.callee);
    let session_id = req.session_id.map(SessionId::new);

    match state
        .coordinator
        .initiate(caller, callee, req.offer, session_id)
        .await
    {
        Ok(call_id) => {
            record_call_initiated();
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(InitiateCallResponse { call_id })),
            )
        }
        Err(e) => {
            error!("API: Failed to initiate call: {}", e);
            domain_error_response(e)
        }
    }
}

/// Answer a call
pub async fn answer_call(
    State(state): State<AppState>,
    AuthenticatedPrincipal(actor): AuthenticatedPrincipal,
    Path(call_id): Path<u64>,
    Json(req): Json<AnswerCallRequest>,
) -> (StatusCode, Json<ApiResponse<String>>) {
    info!("API: {} answering call {}", actor, call_id);

    match state
        .coordinator
        .answer(&actor, CallId::new(call_id), req.answer)
        .await
    {
        Ok(()) => {
            record_call_answered();
            (
                StatusCode::OK,
                Json(ApiResponse::success(format!("Call {} answered", call_id))),
            )
        }
        Err(e) => {
            error!("API: Failed to answer call {}: {}", call_id, e);
            domain_error_response(e)
        }
    }
}

/// Append a connectivity candidate
pub async fn add_candidate(
    State(state): State<AppState>,
    AuthenticatedPrincipal(actor): AuthenticatedPrincipal,
    Path(call_id): Path<u64>,
    Json(req): Json<AddCandidateRequest>,
) -> (StatusCode, Json<ApiResponse<AddCandidateResponse>>) {
    match state
        .coordinator
        .add_candidate(&actor, CallId::new(call_id), req.candidate)
        .await
    {
        Ok(side) => {
            record_candidate_added(side);
            (
                StatusCode::OK,
                Json(ApiResponse::success(AddCandidateResponse { side })),
            )
        }
        Err(e) => {
            error!("API: Failed to add candidate to call {}: {}", call_id, e);
            domain_error_response(e)
        }
    }
}

/// Snapshot of one side's candidate history
pub async fn get_candidates(
    State(state): State<AppState>,
    AuthenticatedPrincipal(actor): AuthenticatedPrincipal,
    Path((call_id, side)): Path<(u64, String)>,
) -> (StatusCode, Json<ApiResponse<CandidateViewResponse>>) {
    let side: CandidateSide = match side.parse() {
        Ok(side) => side,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(message)),
            )
        }
    };

    match state
        .coordinator
        .candidate_view(&actor, CallId::new(call_id), side)
        .await
    {
        Ok(candidates) => (
            StatusCode::OK,
            Json(ApiResponse::success(CandidateViewResponse { side, candidates })),
        ),
        Err(e) => {
            error!("API: Failed to read candidates of call {}: {}", call_id, e);
            domain_error_response(e)
        }
    }
}

/// End a call
pub async fn end_call(
    State(state): State<AppState>,
    AuthenticatedPrincipal(actor): AuthenticatedPrincipal,
    Path(call_id): Path<u64>,
) -> (StatusCode, Json<ApiResponse<String>>) {
    info!("API: {} ending call {}", actor, call_id);

    match state.coordinator.end(&actor, CallId::new(call_id)).await {
        Ok(()) => {
            record_call_ended();
            (
                StatusCode::OK,
                Json(ApiResponse::success(format!("Call {} ended", call_id))),
            )
        }
        Err(e) => {
            error!("API: Failed to end call {}: {}", call_id, e);
            domain_error_response(e)
        }
    }
}

/// The caller's single active call, if any
///
/// Polled continuously by clients; absence is a normal condition and comes
/// back as a successful response with null data, never as an error.
pub async fn get_active_call(
    State(state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
) -> (StatusCode, Json<ApiResponse<Option<CallSnapshot>>>) {
    match state.coordinator.active_call(&principal).await {
        Ok(snapshot) => (StatusCode::OK, Json(ApiResponse::success(snapshot))),
        Err(e) => {
            error!("API: Failed to read active call for {}: {}", principal, e);
            domain_error_response(e)
        }
    }
}

/// Active call bound to a scheduled session
pub async fn get_session_call(
    State(state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Path(session_id): Path<u64>,
) -> (StatusCode, Json<ApiResponse<Option<CallSnapshot>>>) {
    match state
        .coordinator
        .active_call_for_session(&principal, SessionId::new(session_id))
        .await
    {
        Ok(snapshot) => (StatusCode::OK, Json(ApiResponse::success(snapshot))),
        Err(e) => {
            error!(
                "API: Failed to read call for session {}: {}",
                session_id, e
            );
            domain_error_response(e)
        }
    }
}
