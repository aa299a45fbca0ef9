//! Dashboard Error Types

use thiserror::Error;

/// Errors raised while starting or serving the monitor
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A loaded setting failed validation
    #[error("Invalid setting {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    /// Stream endpoint could not be derived
    #[error("Stream error: {0}")]
    Stream(#[from] stream_client::StreamError),

    /// Logging subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// HTTP listener failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
