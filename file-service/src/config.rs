//! Configuration module for the File Service
//!
//! Values are read from environment variables (optionally via a `.env`
//! file) and fall back to the defaults the service has always used:
//! port 8080, `./uploads/` for stored files and `log.log` for the log.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::observability::{LogConfig, LogLevel};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Main configuration structure for the File Service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            server: ServerConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// How the accept loop reacts to a shutdown request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShutdownMode {
    /// Stop accepting and wait for in-flight requests to finish.
    Graceful,
    /// Stop accepting and drop in-flight requests after the acknowledgement is sent.
    Immediate,
}

impl FromStr for ShutdownMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "graceful" => Ok(ShutdownMode::Graceful),
            "immediate" => Ok(ShutdownMode::Immediate),
            other => anyhow::bail!("Unknown shutdown mode '{}'", other),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body limit for uploads. `None` accepts bodies of any size.
    pub max_upload_bytes: Option<usize>,
    pub shutdown_mode: ShutdownMode,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
            max_upload_bytes: match env::var("MAX_UPLOAD_BYTES") {
                Ok(value) => Some(value.parse().context("Invalid MAX_UPLOAD_BYTES")?),
                Err(_) => None,
            },
            shutdown_mode: env::var("SHUTDOWN_MODE")
                .unwrap_or_else(|_| "immediate".to_string())
                .parse()
                .context("Invalid SHUTDOWN_MODE")?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }
        if self.max_upload_bytes == Some(0) {
            anyhow::bail!("Maximum upload size must be greater than 0");
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_bytes: None,
            shutdown_mode: ShutdownMode::Immediate,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./uploads/")),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.upload_dir.as_os_str().is_empty() {
            anyhow::bail!("Upload directory cannot be empty");
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./uploads/"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub file: PathBuf,
    pub level: String,
    pub console: bool,
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            file: env::var("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("log.log")),
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            console: env::var("LOG_CONSOLE")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("Invalid LOG_CONSOLE")?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.file.as_os_str().is_empty() {
            anyhow::bail!("Log file path cannot be empty");
        }
        self.level
            .parse::<LogLevel>()
            .context("Invalid LOG_LEVEL")?;
        Ok(())
    }

    /// Convert into the shared logger settings.
    pub fn to_log_config(&self) -> Result<LogConfig> {
        Ok(LogConfig {
            level: self.level.parse().context("Invalid LOG_LEVEL")?,
            file: self.file.clone(),
            console: self.console,
            service_name: env!("CARGO_PKG_NAME").to_string(),
        })
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("log.log"),
            level: "info".to_string(),
            console: true,
        }
    }
}
