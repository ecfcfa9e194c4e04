//! Parley - a call-signaling coordinator
//!
//! Mediates offer/answer exchange and connectivity-candidate relay between
//! two principals that cannot address each other directly. Payloads are
//! opaque; the coordinator owns call state, resolves role races, and
//! serves a poll-friendly read model for disconnected clients.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;

// Re-export commonly used types
pub use domain::shared::error::DomainError;
pub use domain::shared::result::Result;
