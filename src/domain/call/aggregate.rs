//! Call aggregate root

use crate::domain::call::candidates::CandidateLog;
use crate::domain::call::event::{
    CallAnswered, CallEnded, CallEvent, CallEventBase, CallInitiated, CandidateAdded,
};
use crate::domain::call::value_object::{CallStatus, CandidateSide};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::events::EventMetadata;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{CallId, PrincipalId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Call aggregate root
///
/// One signaling negotiation between exactly two principals. Enforces the
/// role guards and the forward-only status machine; the offer, answer and
/// candidate payloads are stored opaquely and never interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Call {
    /// Aggregate root ID
    id: CallId,
    /// Scheduled-session binding, if the call was initiated inside one
    session_id: Option<SessionId>,
    /// Current status
    status: CallStatus,
    /// Initiating party; fixed at creation
    caller: PrincipalId,
    /// Target party; fixed at creation
    callee: PrincipalId,
    /// Session-description offer, set at creation
    offer: Option<String>,
    /// Session-description answer, set exactly once on answer
    answer: Option<String>,
    /// Candidates submitted by the caller, in submission order
    caller_candidates: CandidateLog,
    /// Candidates submitted by the callee, in submission order
    callee_candidates: CandidateLog,
    /// When the call was initiated
    started_at: DateTime<Utc>,
    /// When the call was answered (if applicable)
    answered_at: Option<DateTime<Utc>>,
    /// When the call ended (if applicable)
    ended_at: Option<DateTime<Utc>>,
    /// Optimistic-concurrency stamp, bumped by the store on each update
    version: u64,
    /// Pending domain events
    #[serde(skip)]
    events: Vec<CallEvent>,
}

impl Call {
    /// Create a new call in Initiated status
    ///
    /// Self-calls are rejected here, at creation time.
    pub fn new(
        id: CallId,
        caller: PrincipalId,
        callee: PrincipalId,
        offer: String,
        session_id: Option<SessionId>,
    ) -> Result<Self> {
        if caller == callee {
            return Err(DomainError::SelfCallNotAllowed);
        }

        let mut call = Self {
            id,
            session_id,
            status: CallStatus::Initiated,
            caller: caller.clone(),
            callee: callee.clone(),
            offer: Some(offer),
            answer: None,
            caller_candidates: CandidateLog::new(),
            callee_candidates: CandidateLog::new(),
            started_at: Utc::now(),
            answered_at: None,
            ended_at: None,
            version: 1,
            events: Vec::new(),
        };

        call.record_event(CallEvent::Initiated(CallInitiated {
            base: CallEventBase {
                metadata: EventMetadata::new("call.initiated".to_string()),
                call_id: id,
            },
            caller,
            callee,
            session_id,
        }));

        Ok(call)
    }

    /// Answer the call
    ///
    /// Only the callee may answer, and only once; a second answer is
    /// rejected rather than silently accepted, since it would overwrite
    /// negotiation state the caller may already have consumed.
    pub fn answer(&mut self, actor: &PrincipalId, answer: String) -> Result<()> {
        if actor != &self.callee {
            return Err(DomainError::Unauthorized(format!(
                "only the callee may answer call {}",
                self.id
            )));
        }

        if self.answer.is_some() {
            return Err(DomainError::AlreadyAnswered);
        }

        self.transition_to(CallStatus::Answered)?;
        let answered_at = Utc::now();
        self.answer = Some(answer);
        self.answered_at = Some(answered_at);

        self.record_event(CallEvent::Answered(CallAnswered {
            base: CallEventBase {
                metadata: EventMetadata::new("call.answered".to_string()),
                call_id: self.id,
            },
            answered_at,
        }));

        Ok(())
    }

    /// Append a connectivity candidate to the submitting participant's side
    ///
    /// Legal while the call is Initiated or Answered; candidates that arrive
    /// before the answer exists are retained and replayed like any others.
    pub fn add_candidate(&mut self, actor: &PrincipalId, candidate: String) -> Result<CandidateSide> {
        let side = self.side_of(actor).ok_or_else(|| {
            DomainError::Unauthorized(format!(
                "{} is not a participant of call {}",
                actor, self.id
            ))
        })?;

        if !self.status.is_active() {
            return Err(DomainError::InvalidTransition(format!(
                "cannot add candidates to ended call {}",
                self.id
            )));
        }

        match side {
            CandidateSide::Caller => self.caller_candidates.append(candidate),
            CandidateSide::Callee => self.callee_candidates.append(candidate),
        }

        self.record_event(CallEvent::CandidateAdded(CandidateAdded {
            base: CallEventBase {
                metadata: EventMetadata::new("call.candidate_added".to_string()),
                call_id: self.id,
            },
            side,
        }));

        Ok(side)
    }

    /// End the call
    ///
    /// Either participant may end, from Initiated or Answered. Terminal and
    /// irreversible.
    pub fn end(&mut self, actor: &PrincipalId) -> Result<()> {
        if self.side_of(actor).is_none() {
            return Err(DomainError::Unauthorized(format!(
                "{} is not a participant of call {}",
                actor, self.id
            )));
        }

        self.transition_to(CallStatus::Ended)?;
        let ended_at = Utc::now();
        self.ended_at = Some(ended_at);

        let duration_seconds = self
            .answered_at
            .map(|answered| (ended_at - answered).num_seconds());

        self.record_event(CallEvent::Ended(CallEnded {
            base: CallEventBase {
                metadata: EventMetadata::new("call.ended".to_string()),
                call_id: self.id,
            },
            ended_by: actor.clone(),
            ended_at,
            duration_seconds,
        }));

        Ok(())
    }

    /// Transition to a new status
    fn transition_to(&mut self, new_status: CallStatus) -> Result<()> {
        if !self.status.can_transition_to(new_status) {
            return Err(DomainError::InvalidTransition(format!(
                "cannot transition call {} from {} to {}",
                self.id, self.status, new_status
            )));
        }

        self.status = new_status;
        Ok(())
    }

    /// Record a domain event
    fn record_event(&mut self, event: CallEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn take_events(&mut self) -> Vec<CallEvent> {
        std::mem::take(&mut self.events)
    }

    /// Which side of the call a principal occupies, if any
    pub fn side_of(&self, principal: &PrincipalId) -> Option<CandidateSide> {
        if principal == &self.caller {
            Some(CandidateSide::Caller)
        } else if principal == &self.callee {
            Some(CandidateSide::Callee)
        } else {
            None
        }
    }

    pub fn is_participant(&self, principal: &PrincipalId) -> bool {
        self.side_of(principal).is_some()
    }

    /// Candidate list for a given side, in submission order
    pub fn candidates(&self, side: CandidateSide) -> &CandidateLog {
        match side {
            CandidateSide::Caller => &self.caller_candidates,
            CandidateSide::Callee => &self.callee_candidates,
        }
    }

    // Getters
    pub fn id(&self) -> CallId {
        self.id
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    pub fn caller(&self) -> &PrincipalId {
        &self.caller
    }

    pub fn callee(&self) -> &PrincipalId {
        &self.callee
    }

    pub fn offer(&self) -> Option<&str> {
        self.offer.as_deref()
    }

    pub fn answer_sdp(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn answered_at(&self) -> Option<DateTime<Utc>> {
        self.answered_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
