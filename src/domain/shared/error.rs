//! Domain errors

use thiserror::Error;

/// Domain result type
pub type Result<T> = std::result::Result<T, DomainError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Call not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    #[error("Participant already in an active call: {0}")]
    AlreadyInCall(String),

    #[error("A call cannot target its own initiator")]
    SelfCallNotAllowed,

    #[error("Call has already been answered")]
    AlreadyAnswered,

    /// Optimistic-concurrency stamp mismatch. Not a domain outcome; the
    /// coordinator retries these with bounded attempts.
    #[error("Concurrent update conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
