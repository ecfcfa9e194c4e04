//! Persistence adapters

pub mod memory;

pub use memory::InMemoryCallStore;
