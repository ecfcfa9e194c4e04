//! Call bounded context - manages the lifecycle of signaling negotiations

pub mod aggregate;
pub mod candidates;
pub mod event;
pub mod repository;
pub mod value_object;

pub use aggregate::Call;
pub use candidates::CandidateLog;
pub use event::CallEvent;
pub use repository::CallStore;
pub use value_object::{CallStatus, CandidateSide};
