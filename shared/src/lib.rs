//! Shared utilities for file exchange backend services

pub use tracing;

pub mod observability;
