//! Signaling API DTOs

use crate::domain::call::value_object::CandidateSide;
use crate::domain::shared::value_objects::CallId;
use serde::{Deserialize, Serialize};

/// Generic API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Initiate request: target principal plus the opaque offer payload
#[derive(Debug, Serialize, Deserialize)]
pub struct InitiateCallRequest {
    pub callee: String,
    pub offer: String,
    /// Optional scheduled-session binding
    pub session_id: Option<u64>,
}

/// Initiate response
#[derive(Debug, Serialize, Deserialize)]
pub struct InitiateCallResponse {
    pub call_id: CallId,
}

/// Answer request: the opaque answer payload
#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerCallRequest {
    pub answer: String,
}

/// Candidate submission; the side is resolved from the caller's identity
#[derive(Debug, Serialize, Deserialize)]
pub struct AddCandidateRequest {
    pub candidate: String,
}

/// Candidate submission acknowledgment
#[derive(Debug, Serialize, Deserialize)]
pub struct AddCandidateResponse {
    pub side: CandidateSide,
}

/// One side's full candidate history
#[derive(Debug, Serialize, Deserialize)]
pub struct CandidateViewResponse {
    pub side: CandidateSide,
    pub candidates: Vec<String>,
}
