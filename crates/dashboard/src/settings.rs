//! Monitor settings

use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use stream_client::{ConnectionConfig, RECONNECT_DELAY_MS};
use url::Url;

/// Environment variable overriding the config file path
pub const CONFIG_PATH_ENV: &str = "BUS_MONITOR_CONFIG";

/// Prefix of environment overrides (e.g. `BUS_MONITOR_BUS_ID`)
pub const ENV_PREFIX: &str = "BUS_MONITOR";

/// Monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// URL of the hosting dashboard page; the stream endpoint is derived from it
    pub page_url: String,
    /// Identifier of the tracked bus
    pub bus_id: String,
    /// Fixed reconnect delay (default: 3000)
    pub reconnect_delay_ms: u64,
    /// Bind address of the HTTP status API
    pub http_addr: String,
    /// Maximum log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            page_url: "http://localhost:3000/".to_string(),
            bus_id: "bus01".to_string(),
            reconnect_delay_ms: RECONNECT_DELAY_MS,
            http_addr: "0.0.0.0:8080".to_string(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl MonitorConfig {
    /// Load defaults, then the optional config file, then environment overrides
    pub fn load() -> Result<Self, DashboardError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "bus-monitor".to_string());
        Self::load_from(&path, config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Environment values are not type-guessed; `bus_id = "007"` stays a string
    fn load_from(path: &str, environment: config::Environment) -> Result<Self, DashboardError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&MonitorConfig::default())?)
            .add_source(config::File::with_name(path).required(false))
            .add_source(environment)
            .build()?;

        let config: MonitorConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check loaded values
    pub fn validate(&self) -> Result<(), DashboardError> {
        self.stream_endpoint()?;

        if self.bus_id.trim().is_empty() {
            return Err(DashboardError::InvalidSetting {
                field: "bus_id",
                reason: "must not be empty".to_string(),
            });
        }
        if self.reconnect_delay_ms == 0 {
            return Err(DashboardError::InvalidSetting {
                field: "reconnect_delay_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Stream endpoint on the page's host
    pub fn stream_endpoint(&self) -> Result<Url, DashboardError> {
        let page = Url::parse(&self.page_url).map_err(|e| DashboardError::InvalidSetting {
            field: "page_url",
            reason: e.to_string(),
        })?;
        Ok(stream_client::stream_endpoint(&page)?)
    }

    /// Connection manager settings
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            reconnect_delay_ms: self.reconnect_delay_ms,
        }
    }
}
