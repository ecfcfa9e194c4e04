//! Call domain events

use crate::domain::call::value_object::CandidateSide;
use crate::domain::shared::events::{DomainEvent, EventMetadata};
use crate::domain::shared::value_objects::{CallId, PrincipalId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base struct for all call events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEventBase {
    pub metadata: EventMetadata,
    pub call_id: CallId,
}

/// Call initiated event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallInitiated {
    pub base: CallEventBase,
    pub caller: PrincipalId,
    pub callee: PrincipalId,
    pub session_id: Option<SessionId>,
}

impl DomainEvent for CallInitiated {
    fn event_type(&self) -> &'static str {
        "call.initiated"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Call answered event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallAnswered {
    pub base: CallEventBase,
    pub answered_at: DateTime<Utc>,
}

impl DomainEvent for CallAnswered {
    fn event_type(&self) -> &'static str {
        "call.answered"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Candidate appended event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateAdded {
    pub base: CallEventBase,
    pub side: CandidateSide,
}

impl DomainEvent for CandidateAdded {
    fn event_type(&self) -> &'static str {
        "call.candidate_added"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Call ended event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEnded {
    pub base: CallEventBase,
    pub ended_by: PrincipalId,
    pub ended_at: DateTime<Utc>,
    pub duration_seconds: Option<i64>,
}

impl DomainEvent for CallEnded {
    fn event_type(&self) -> &'static str {
        "call.ended"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Union of all call events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallEvent {
    Initiated(CallInitiated),
    Answered(CallAnswered),
    CandidateAdded(CandidateAdded),
    Ended(CallEnded),
}

impl CallEvent {
    pub fn call_id(&self) -> CallId {
        match self {
            CallEvent::Initiated(e) => e.base.call_id,
            CallEvent::Answered(e) => e.base.call_id,
            CallEvent::CandidateAdded(e) => e.base.call_id,
            CallEvent::Ended(e) => e.base.call_id,
        }
    }
}
