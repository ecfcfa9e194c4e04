//! Call store interface

use crate::domain::call::aggregate::Call;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{CallId, PrincipalId, SessionId};
use async_trait::async_trait;

/// Storage port for Call aggregates
///
/// Defined in the domain layer as a trait (port), implemented in the
/// infrastructure layer (adapter). The store is the single source of truth
/// and the serialization point for per-call races: `update` is an atomic
/// compare-and-set on the aggregate's version stamp, and `insert`
/// atomically enforces the one-active-call-per-participant invariant
/// through its principal index.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallStore: Send + Sync {
    /// Allocate the next monotonic call id
    async fn next_id(&self) -> CallId;

    /// Insert a freshly created call
    ///
    /// Fails with `AlreadyInCall` if either participant already holds an
    /// active call, atomically with the index update.
    async fn insert(&self, call: Call) -> Result<()>;

    /// Find a call by its ID (ended calls are retained for audit)
    async fn get(&self, id: CallId) -> Result<Option<Call>>;

    /// Compare-and-set update
    ///
    /// Succeeds only if the stored version equals `expected_version`, else
    /// fails with `Conflict`. A transition to Ended drops the call from the
    /// active indexes.
    async fn update(&self, call: Call, expected_version: u64) -> Result<()>;

    /// Active (non-ended) call where the principal is caller or callee
    async fn find_active_for(&self, principal: &PrincipalId) -> Result<Option<Call>>;

    /// Active call bound to a scheduled session
    async fn find_active_for_session(&self, session_id: SessionId) -> Result<Option<Call>>;

    /// All active calls
    async fn list_active(&self) -> Result<Vec<Call>>;

    /// Number of active calls
    async fn active_count(&self) -> usize;
}
