//! Poll-friendly call projection

use crate::domain::call::aggregate::Call;
use crate::domain::call::value_object::{CallStatus, CandidateSide};
use crate::domain::shared::value_objects::{CallId, PrincipalId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-optimized projection of a call, consumed by polling clients.
///
/// Built from a single consistent copy of the aggregate, so a poller sees
/// the answer together with the full candidate history the moment the
/// status reads `answered`; there is no transient state a slow poller can
/// skip, and no torn view of a half-applied write. Candidate lists are the
/// complete per-side history (a late joiner replays everything).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSnapshot {
    pub id: CallId,
    pub session_id: Option<SessionId>,
    pub status: CallStatus,
    pub caller: PrincipalId,
    pub callee: PrincipalId,
    pub offer: Option<String>,
    pub answer: Option<String>,
    pub caller_candidates: Vec<String>,
    pub callee_candidates: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub answered_at: Option<DateTime<Utc>>,
}

impl From<&Call> for CallSnapshot {
    fn from(call: &Call) -> Self {
        CallSnapshot {
            id: call.id(),
            session_id: call.session_id(),
            status: call.status(),
            caller: call.caller().clone(),
            callee: call.callee().clone(),
            offer: call.offer().map(str::to_string),
            answer: call.answer_sdp().map(str::to_string),
            caller_candidates: call.candidates(CandidateSide::Caller).snapshot(),
            callee_candidates: call.candidates(CandidateSide::Callee).snapshot(),
            started_at: call.started_at(),
            answered_at: call.answered_at(),
        }
    }
}

impl CallSnapshot {
    /// Candidate history for the given side
    pub fn candidates(&self, side: CandidateSide) -> &[String] {
        match side {
            CandidateSide::Caller => &self.caller_candidates,
            CandidateSide::Callee => &self.callee_candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_carries_answer_and_history() {
        let alice = PrincipalId::new("alice");
        let bob = PrincipalId::new("bob");
        let mut call =
            Call::new(CallId::new(7), alice.clone(), bob.clone(), "O1".to_string(), None).unwrap();

        call.add_candidate(&alice, "ice-c1".to_string()).unwrap();
        call.answer(&bob, "A1".to_string()).unwrap();
        call.add_candidate(&bob, "ice-d1".to_string()).unwrap();

        let snapshot = CallSnapshot::from(&call);

        // a poller attaching only now still sees everything
        assert_eq!(snapshot.status, CallStatus::Answered);
        assert_eq!(snapshot.offer.as_deref(), Some("O1"));
        assert_eq!(snapshot.answer.as_deref(), Some("A1"));
        assert_eq!(snapshot.candidates(CandidateSide::Caller), ["ice-c1"]);
        assert_eq!(snapshot.candidates(CandidateSide::Callee), ["ice-d1"]);
        assert!(snapshot.answered_at.is_some());
    }
}
