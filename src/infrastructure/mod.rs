//! Infrastructure layer - Adapters for the domain's ports

pub mod persistence;
