//! In-memory call store

use crate::domain::call::aggregate::Call;
use crate::domain::call::repository::CallStore;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{CallId, PrincipalId, SessionId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// In-memory implementation of the `CallStore` port
///
/// All mutations take the inner write lock, so an insert and its index
/// updates are atomic, and the compare-and-set in `update` observes a
/// consistent version stamp. Ended calls stay in the main map for audit
/// but leave the active indexes, which is what gives every later per-call
/// operation its "not found" semantics.
pub struct InMemoryCallStore {
    inner: RwLock<StoreInner>,
    next_id: AtomicU64,
}

#[derive(Default)]
struct StoreInner {
    calls: HashMap<CallId, Call>,
    /// principal -> active call id; one active call per participant
    by_principal: HashMap<PrincipalId, CallId>,
    /// scheduled session -> active call id
    by_session: HashMap<SessionId, CallId>,
}

impl InMemoryCallStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            next_id: AtomicU64::new(1),
        }
    }

    fn drop_active_indexes(inner: &mut StoreInner, call: &Call) {
        if inner.by_principal.get(call.caller()) == Some(&call.id()) {
            inner.by_principal.remove(call.caller());
        }
        if inner.by_principal.get(call.callee()) == Some(&call.id()) {
            inner.by_principal.remove(call.callee());
        }
        if let Some(session_id) = call.session_id() {
            if inner.by_session.get(&session_id) == Some(&call.id()) {
                inner.by_session.remove(&session_id);
            }
        }
    }
}

impl Default for InMemoryCallStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CallStore for InMemoryCallStore {
    async fn next_id(&self) -> CallId {
        CallId::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn insert(&self, call: Call) -> Result<()> {
        let mut inner = self.inner.write().await;

        if inner.by_principal.contains_key(call.caller()) {
            return Err(DomainError::AlreadyInCall(call.caller().to_string()));
        }
        if inner.by_principal.contains_key(call.callee()) {
            return Err(DomainError::AlreadyInCall(call.callee().to_string()));
        }

        inner.by_principal.insert(call.caller().clone(), call.id());
        inner.by_principal.insert(call.callee().clone(), call.id());
        if let Some(session_id) = call.session_id() {
            inner.by_session.insert(session_id, call.id());
        }
        inner.calls.insert(call.id(), call);

        Ok(())
    }

    async fn get(&self, id: CallId) -> Result<Option<Call>> {
        let inner = self.inner.read().await;
        Ok(inner.calls.get(&id).cloned())
    }

    async fn update(&self, mut call: Call, expected_version: u64) -> Result<()> {
        let mut inner = self.inner.write().await;

        let stored = inner
            .calls
            .get(&call.id())
            .ok_or_else(|| DomainError::NotFound(call.id().to_string()))?;

        if stored.version() != expected_version {
            return Err(DomainError::Conflict(format!(
                "call {} is at version {}, expected {}",
                call.id(),
                stored.version(),
                expected_version
            )));
        }

        call.set_version(expected_version + 1);

        if !call.is_active() {
            Self::drop_active_indexes(&mut inner, &call);
        }
        inner.calls.insert(call.id(), call);

        Ok(())
    }

    async fn find_active_for(&self, principal: &PrincipalId) -> Result<Option<Call>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_principal
            .get(principal)
            .and_then(|id| inner.calls.get(id))
            .cloned())
    }

    async fn find_active_for_session(&self, session_id: SessionId) -> Result<Option<Call>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_session
            .get(&session_id)
            .and_then(|id| inner.calls.get(id))
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<Call>> {
        let inner = self.inner.read().await;
        Ok(inner
            .calls
            .values()
            .filter(|call| call.is_active())
            .cloned()
            .collect())
    }

    async fn active_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.calls.values().filter(|call| call.is_active()).count()
    }
}
