//! Structured logging setup for all services
//!
//! Every service writes newline-delimited JSON records to a single
//! append-only file. Event fields are flattened to the top level of each
//! record, so `tracing::info!(func = "ping_handler", "Received ping request.")`
//! becomes `{"timestamp":..,"level":"INFO","func":"ping_handler","message":..}`.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::{ObservabilityError, ObservabilityResult};

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ObservabilityError::InvalidLevel(other.to_string())),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    /// Destination file, opened in append mode.
    pub file: PathBuf,
    /// Echo events to stdout in compact form.
    pub console: bool,
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: PathBuf::from("log.log"),
            console: true,
            service_name: "file-service".to_string(),
        }
    }
}

/// Build the subscriber without installing it.
///
/// The returned guard owns the background writer; dropping it flushes any
/// buffered records to the log file.
pub fn build_subscriber(
    config: &LogConfig,
) -> ObservabilityResult<(impl Subscriber + Send + Sync + 'static, WorkerGuard)> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .map_err(|source| ObservabilityError::LogFile {
            path: config.file.clone(),
            source,
        })?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    // Create filter from environment or config
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let file_layer = fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_target(true)
        .with_writer(writer);

    let console_layer = config
        .console
        .then(|| fmt::layer().compact().with_target(false));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer);

    Ok((subscriber, guard))
}

/// Initialize logging for the service.
///
/// Must be called once per process. Keep the returned guard alive until
/// the service exits.
pub fn init_logging(config: &LogConfig) -> ObservabilityResult<WorkerGuard> {
    let (subscriber, guard) = build_subscriber(config)?;
    subscriber
        .try_init()
        .map_err(|e| ObservabilityError::Logging(e.to_string()))?;

    tracing::info!(
        main = "init logging",
        service = %config.service_name,
        level = %config.level.as_str(),
        "Logging initialized"
    );

    Ok(guard)
}
