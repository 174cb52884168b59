//! Helpers shared by the in-crate test modules.

use std::path::PathBuf;

use serde_json::Value;
use shared::observability::{build_subscriber, LogConfig};
use tempfile::TempDir;
use tracing::subscriber::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;

/// Routes events on the current thread into a temporary JSON-lines log.
pub struct LogCapture {
    path: PathBuf,
    dir: TempDir,
    default: DefaultGuard,
    writer: WorkerGuard,
}

impl LogCapture {
    pub fn start() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("log.log");
        let config = LogConfig {
            file: path.clone(),
            console: false,
            ..Default::default()
        };

        let (subscriber, writer) = build_subscriber(&config).expect("Failed to build subscriber");
        let default = tracing::subscriber::set_default(subscriber);

        Self {
            path,
            dir,
            default,
            writer,
        }
    }

    /// Stop capturing, flush and return every record written so far.
    pub fn finish(self) -> Vec<Value> {
        let LogCapture {
            path,
            dir,
            default,
            writer,
        } = self;
        drop(default);
        drop(writer);

        let records = std::fs::read_to_string(&path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        drop(dir);
        records
    }
}
