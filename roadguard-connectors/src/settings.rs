//! Device settings file
//!
//! One JSON document describes a vehicle deployment: where telemetry goes,
//! which host to probe for connectivity and the controller tunables.
//! Missing fields take their defaults, so the smallest useful file names
//! only the endpoint:
//!
//! ```json
//! {
//!   "endpoint": "https://pothole-data.firebaseio.com",
//!   "auth_token": "database-secret",
//!   "controller": { "calibration_window_ms": 3000 }
//! }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use roadguard_core::{ConfigError, ControllerConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "http")]
use crate::http::HttpConfig;

/// Settings loading errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File could not be read
    #[error("Cannot read settings: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid settings JSON
    #[error("Invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Controller section failed validation
    #[error("Invalid controller settings: {0}")]
    Controller(#[from] ConfigError),

    /// A required field is empty
    #[error("Missing setting: {0}")]
    Missing(&'static str),

    /// A duration that must be positive is zero
    #[error("Setting must be greater than zero: {0}")]
    Zero(&'static str),
}

/// Deployment settings for one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Base URL of the telemetry endpoint
    pub endpoint: String,
    /// Path records are posted to
    pub path: String,
    /// Token sent as the `auth` query parameter, if any
    pub auth_token: Option<String>,
    /// `host:port` probed for connectivity
    pub probe_addr: String,
    /// Seconds between connectivity probes
    pub probe_interval_secs: u64,
    /// Telemetry request timeout in seconds
    pub request_timeout_secs: u64,
    /// Controller tunables
    pub controller: ControllerConfig,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            path: "/roadData.json".into(),
            auth_token: None,
            probe_addr: String::new(),
            probe_interval_secs: 5,
            request_timeout_secs: 2,
            controller: ControllerConfig::default(),
        }
    }
}

impl DeviceSettings {
    /// Read and validate a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let mut settings: Self = serde_json::from_str(text)?;
        if settings.probe_addr.is_empty() {
            settings.probe_addr = probe_addr_for(&settings.endpoint).unwrap_or_default();
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Check required fields and the controller section
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.endpoint.is_empty() {
            return Err(SettingsError::Missing("endpoint"));
        }
        if self.probe_addr.is_empty() {
            return Err(SettingsError::Missing("probe_addr"));
        }
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::Zero("request_timeout_secs"));
        }
        self.controller.validate()?;
        Ok(())
    }

    /// Interval between connectivity probes
    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }

    /// HTTP sink configuration for these settings
    #[cfg(feature = "http")]
    pub fn http_config(&self) -> HttpConfig {
        let config = HttpConfig::new(self.endpoint.clone())
            .path(self.path.clone())
            .timeout_secs(self.request_timeout_secs);

        match &self.auth_token {
            Some(token) => config.query_token("auth", token.clone()),
            None => config,
        }
    }
}

/// `host:port` of an `http(s)://host[:port]/...` URL
fn probe_addr_for(endpoint: &str) -> Option<String> {
    let (default_port, rest) = if let Some(rest) = endpoint.strip_prefix("https://") {
        (443, rest)
    } else if let Some(rest) = endpoint.strip_prefix("http://") {
        (80, rest)
    } else {
        return None;
    };

    let host_port = rest.split('/').next()?;
    if host_port.is_empty() {
        return None;
    }

    // Bracketed IPv6 literal: only a colon after `]` is a port
    let port_part = match host_port.strip_prefix('[') {
        Some(bracketed) => &bracketed[bracketed.find(']')? + 1..],
        None => host_port,
    };
    if port_part.contains(':') {
        Some(host_port.to_string())
    } else {
        Some(format!("{}:{}", host_port, default_port))
    }
}
