//! Observability utilities for logging
//!
//! Provides centralized structured logging setup for all services

pub mod logging;

pub use logging::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Logging setup error: {0}")]
    Logging(String),

    #[error("Failed to open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid log level: {0}")]
    InvalidLevel(String),
}

pub type ObservabilityResult<T> = Result<T, ObservabilityError>;
