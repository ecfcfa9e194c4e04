//! Signaling coordinator - the application façade over the call domain

use crate::application::read_model::CallSnapshot;
use crate::domain::call::aggregate::Call;
use crate::domain::call::event::CallEvent;
use crate::domain::call::repository::CallStore;
use crate::domain::call::value_object::{CallStatus, CandidateSide};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{CallId, PrincipalId, SessionId};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Bounded retries for contended compare-and-set updates. Contention is a
/// resource artifact, not a domain outcome; past this it surfaces as
/// `Internal`.
const MAX_CAS_ATTEMPTS: u32 = 3;

/// Capacity of the call-event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// The public operation surface of the signaling system.
///
/// Composes the call store, the aggregate's state machine, and the
/// candidate logs; every operation is authorization-checked against the
/// acting principal before state is touched. Mutations run a
/// load/mutate/compare-and-set loop so that racing operations on one call
/// serialize: exactly one of two concurrent answers wins, and the loser
/// re-reads and observes `AlreadyAnswered`.
pub struct SignalingCoordinator {
    store: Arc<dyn CallStore>,
    events: broadcast::Sender<CallEvent>,
}

impl SignalingCoordinator {
    pub fn new(store: Arc<dyn CallStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { store, events }
    }

    /// Subscribe to the stream of call events
    pub fn subscribe(&self) -> broadcast::Receiver<CallEvent> {
        self.events.subscribe()
    }

    /// Initiate a call to `callee`, publishing the opaque offer.
    ///
    /// The store's insert is the atomic guard for the
    /// one-active-call-per-participant invariant; a self-call never reaches
    /// the store.
    pub async fn initiate(
        &self,
        caller: PrincipalId,
        callee: PrincipalId,
        offer: String,
        session_id: Option<SessionId>,
    ) -> Result<CallId> {
        let id = self.store.next_id().await;
        let mut call = Call::new(id, caller.clone(), callee.clone(), offer, session_id)?;
        let events = call.take_events();

        self.store.insert(call).await?;
        self.publish(events);

        info!("Call {} initiated: {} -> {}", id, caller, callee);
        Ok(id)
    }

    /// Publish the callee's answer for a call
    pub async fn answer(&self, actor: &PrincipalId, id: CallId, answer: String) -> Result<()> {
        self.mutate(id, |call| call.answer(actor, answer.clone())).await?;
        info!("Call {} answered by {}", id, actor);
        Ok(())
    }

    /// Append a connectivity candidate on the acting participant's side
    pub async fn add_candidate(
        &self,
        actor: &PrincipalId,
        id: CallId,
        candidate: String,
    ) -> Result<CandidateSide> {
        let side = self
            .mutate(id, |call| call.add_candidate(actor, candidate.clone()))
            .await?;
        debug!("Candidate appended to call {} on the {} side", id, side);
        Ok(side)
    }

    /// End a call. Terminal; a second end observes `NotFound` because the
    /// call has left the active namespace.
    pub async fn end(&self, actor: &PrincipalId, id: CallId) -> Result<()> {
        self.mutate(id, |call| call.end(actor)).await?;
        info!("Call {} ended by {}", id, actor);
        Ok(())
    }

    /// The single active call the principal participates in, if any.
    ///
    /// Absence is a normal, continuously polled condition, not an error.
    pub async fn active_call(&self, principal: &PrincipalId) -> Result<Option<CallSnapshot>> {
        let call = self.store.find_active_for(principal).await?;
        Ok(call.as_ref().map(CallSnapshot::from))
    }

    /// Active call bound to a scheduled session, for participants of that
    /// call only.
    pub async fn active_call_for_session(
        &self,
        principal: &PrincipalId,
        session_id: SessionId,
    ) -> Result<Option<CallSnapshot>> {
        let call = match self.store.find_active_for_session(session_id).await? {
            Some(call) => call,
            None => return Ok(None),
        };

        if !call.is_participant(principal) {
            return Err(DomainError::Unauthorized(format!(
                "{} is not a participant of the call for session {}",
                principal, session_id
            )));
        }

        Ok(Some(CallSnapshot::from(&call)))
    }

    /// Full snapshot of one side's candidate list (non-destructive view)
    pub async fn candidate_view(
        &self,
        actor: &PrincipalId,
        id: CallId,
        side: CandidateSide,
    ) -> Result<Vec<String>> {
        let call = self.load_active(id).await?;

        if !call.is_participant(actor) {
            return Err(DomainError::Unauthorized(format!(
                "{} is not a participant of call {}",
                actor, id
            )));
        }

        Ok(call.candidates(side).snapshot())
    }

    /// Number of active calls (feeds the metrics gauge)
    pub async fn active_count(&self) -> usize {
        self.store.active_count().await
    }

    /// End calls that have sat unanswered past `max_age`.
    ///
    /// Deployment policy, not part of the core contract; wired to a
    /// background task only when configured. Each eligible call is
    /// re-checked under its own compare-and-set, so a call that gets
    /// answered while the sweep runs is left alone.
    pub async fn sweep_unanswered(&self, max_age: Duration) -> Result<usize> {
        let cutoff = Utc::now() - max_age;
        let mut swept = 0;

        for stale in self.store.list_active().await? {
            if stale.status() != CallStatus::Initiated || stale.started_at() >= cutoff {
                continue;
            }

            let mut call = match self.store.get(stale.id()).await? {
                Some(call) => call,
                None => continue,
            };
            if call.status() != CallStatus::Initiated || call.started_at() >= cutoff {
                continue;
            }

            let expected = call.version();
            let ended_by = call.caller().clone();
            if call.end(&ended_by).is_err() {
                continue;
            }
            let events = call.take_events();

            match self.store.update(call, expected).await {
                Ok(()) => {
                    self.publish(events);
                    info!("Swept unanswered call {}", stale.id());
                    swept += 1;
                }
                // Lost the race to a real operation; the call is not idle.
                Err(DomainError::Conflict(_)) | Err(DomainError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(swept)
    }

    /// Load a call that is still in the active namespace
    async fn load_active(&self, id: CallId) -> Result<Call> {
        match self.store.get(id).await? {
            Some(call) if call.is_active() => Ok(call),
            _ => Err(DomainError::NotFound(id.to_string())),
        }
    }

    /// Load/mutate/compare-and-set loop with bounded retry on contention
    async fn mutate<T, F>(&self, id: CallId, mut op: F) -> Result<T>
    where
        F: FnMut(&mut Call) -> Result<T>,
    {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let mut call = self.load_active(id).await?;
            let expected = call.version();

            let outcome = op(&mut call)?;
            let events = call.take_events();

            match self.store.update(call, expected).await {
                Ok(()) => {
                    self.publish(events);
                    return Ok(outcome);
                }
                Err(DomainError::Conflict(reason)) => {
                    if attempt == MAX_CAS_ATTEMPTS {
                        warn!(
                            "Giving up on call {} after {} contended updates",
                            id, MAX_CAS_ATTEMPTS
                        );
                        return Err(DomainError::Internal(format!(
                            "call {} update contended {} times: {}",
                            id, MAX_CAS_ATTEMPTS, reason
                        )));
                    }
                    debug!("CAS conflict on call {} (attempt {}), retrying", id, attempt);
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::Internal(format!(
            "call {} update retry loop exhausted",
            id
        )))
    }

    fn publish(&self, events: Vec<CallEvent>) {
        for event in events {
            // Ignore send errors (no subscribers)
            let _ = self.events.send(event);
        }
    }
}
