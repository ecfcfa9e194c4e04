//! Application layer - Use cases and application services
//!
//! This layer orchestrates domain objects to fulfill use cases.
//! It's responsible for:
//! - Authorization against the acting principal
//! - Serializing racing operations on a single call
//! - Publishing domain events
//! - Projecting aggregates into read models

pub mod read_model;
pub mod signaling;

pub use read_model::CallSnapshot;
pub use signaling::SignalingCoordinator;
