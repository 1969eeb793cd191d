//! HTTP/HTTPS Telemetry Sink - REST Ingest for Dashboard Records
//!
//! ## Overview
//!
//! Posts each change-triggered `TelemetryRecord` as a JSON object to a
//! REST endpoint. Written against the Firebase Realtime Database REST API
//! (`POST {base}/roadData.json?auth=...`) but works with any endpoint that
//! accepts a JSON body.
//!
//! ## Design Decisions
//!
//! ### Blocking, no retries
//!
//! The control loop calls the sink inline, so every retry would delay the
//! next sensing cycle. A record that fails is dropped and counted; the next
//! state change produces a fresher one anyway.
//!
//! ### Implementation Choices
//!
//! We intentionally keep this simple and lightweight:
//! - `ureq` blocking client, one agent reused across requests
//! - JSON only
//! - Request timeout bounds how long a bad network can stall the loop
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use roadguard_connectors::http::{HttpConfig, HttpTelemetrySink};
//! use roadguard_core::{TelemetryRecord, TelemetrySink};
//!
//! let config = HttpConfig::new("https://pothole-data.firebaseio.com")
//!     .path("/roadData.json")
//!     .query_token("auth", "database-secret")
//!     .timeout_secs(2);
//!
//! let mut sink = HttpTelemetrySink::new(config)?;
//! let record = TelemetryRecord { distance: 18.2, speed: 110, severity: 2, road_score: 88 };
//! sink.send(&record)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::HashMap;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use roadguard_core::{TelemetryRecord, TelemetrySink};
use thiserror::Error;

use crate::ConnectionStats;

/// HTTP-specific errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or transport error
    #[error("Request failed: {0}")]
    Request(String),

    /// Server returned error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Authentication methods
#[derive(Clone, Debug, PartialEq)]
pub enum AuthMethod {
    /// No authentication
    None,
    /// Bearer token
    Bearer(String),
    /// Basic authentication
    Basic { username: String, password: String },
    /// API key in header
    ApiKey { header: String, value: String },
    /// Token as a query parameter (Firebase `?auth=`)
    QueryToken { param: String, value: String },
}

/// HTTP configuration
#[derive(Clone, Debug)]
pub struct HttpConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Path records are posted to
    pub path: String,
    /// Request timeout
    pub timeout: Duration,
    /// Authentication method
    pub auth: AuthMethod,
    /// Custom headers
    pub headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl HttpConfig {
    /// Create new configuration with base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: "/roadData.json".into(),
            timeout: Duration::from_secs(5),
            auth: AuthMethod::None,
            headers: HashMap::new(),
            user_agent: format!("RoadGuard/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the path records are posted to
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set bearer token authentication
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthMethod::Bearer(token.into());
        self
    }

    /// Set basic authentication
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    /// Set API key authentication
    pub fn api_key(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth = AuthMethod::ApiKey {
            header: header.into(),
            value: value.into(),
        };
        self
    }

    /// Set query parameter token authentication
    pub fn query_token(mut self, param: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth = AuthMethod::QueryToken {
            param: param.into(),
            value: value.into(),
        };
        self
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Add custom header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Full URL records are posted to
    pub fn url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.path.starts_with('/') {
            format!("{}{}", base, self.path)
        } else {
            format!("{}/{}", base, self.path)
        }
    }
}

/// Telemetry sink posting JSON records with the ureq client
pub struct HttpTelemetrySink {
    config: HttpConfig,
    url: String,
    agent: ureq::Agent,
    stats: ConnectionStats,
}

impl HttpTelemetrySink {
    /// Create new HTTP sink
    pub fn new(config: HttpConfig) -> Result<Self, HttpError> {
        // Validate base URL
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(HttpError::Config("Base URL must start with http:// or https://".into()));
        }
        if config.timeout.is_zero() {
            return Err(HttpError::Config("Timeout must be greater than zero".into()));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            url: config.url(),
            config,
            agent,
            stats: ConnectionStats::default(),
        })
    }

    /// Delivery statistics
    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    /// Configuration in use
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Build request with authentication and headers
    fn build_request(&self) -> ureq::Request {
        let mut request = self.agent.post(&self.url);

        match &self.config.auth {
            AuthMethod::None => {},
            AuthMethod::Bearer(token) => {
                request = request.set("Authorization", &format!("Bearer {}", token));
            },
            AuthMethod::Basic { username, password } => {
                let credentials = STANDARD.encode(format!("{}:{}", username, password));
                request = request.set("Authorization", &format!("Basic {}", credentials));
            },
            AuthMethod::ApiKey { header, value } => {
                request = request.set(header, value);
            },
            AuthMethod::QueryToken { param, value } => {
                request = request.query(param, value);
            },
        }

        for (name, value) in &self.config.headers {
            request = request.set(name, value);
        }

        request
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
    }

    fn post(&self, body: &str) -> Result<(), HttpError> {
        match self.build_request().send_string(body) {
            Ok(response) => {
                let status = response.status();
                let text = response.into_string().unwrap_or_default();
                log::debug!("telemetry accepted ({}): {}", status, text);
                Ok(())
            }
            Err(ureq::Error::Status(code, response)) => Err(HttpError::ServerError {
                status: code,
                message: response.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(e)) => Err(HttpError::Request(e.to_string())),
        }
    }
}

impl TelemetrySink for HttpTelemetrySink {
    type Error = HttpError;

    fn send(&mut self, record: &TelemetryRecord) -> Result<(), Self::Error> {
        let body = encode_record(record)?;

        match self.post(&body) {
            Ok(()) => {
                self.stats.record_success(body.len());
                Ok(())
            }
            Err(e) => {
                log::warn!("telemetry POST to {} failed: {}", self.url, e);
                self.stats.record_failure(&e);
                Err(e)
            }
        }
    }
}

/// JSON body for one record
pub fn encode_record(record: &TelemetryRecord) -> Result<String, HttpError> {
    Ok(serde_json::to_string(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = HttpConfig::new("https://api.example.com")
            .bearer_token("test-token")
            .timeout_secs(2)
            .path("/ingest")
            .header("X-Custom", "value");

        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.url(), "https://api.example.com/ingest");
        assert!(config.headers.contains_key("X-Custom"));

        match config.auth {
            AuthMethod::Bearer(token) => assert_eq!(token, "test-token"),
            _ => panic!("Wrong auth method"),
        }
    }

    #[test]
    fn test_url_joining() {
        let config = HttpConfig::new("https://db.example.com/").path("roadData.json");
        assert_eq!(config.url(), "https://db.example.com/roadData.json");

        let config = HttpConfig::new("https://db.example.com");
        assert_eq!(config.url(), "https://db.example.com/roadData.json");
    }

    #[test]
    fn test_url_validation() {
        assert!(HttpTelemetrySink::new(HttpConfig::new("not-a-url")).is_err());
        assert!(HttpTelemetrySink::new(HttpConfig::new("https://valid.url")).is_ok());

        let mut zero = HttpConfig::new("https://valid.url");
        zero.timeout = Duration::ZERO;
        assert!(matches!(HttpTelemetrySink::new(zero), Err(HttpError::Config(_))));
    }

    #[test]
    fn test_record_body_uses_dashboard_names() {
        let record = TelemetryRecord { distance: 18.25, speed: 110, severity: 2, road_score: 88 };
        let body = encode_record(&record).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(value["distance"], 18.25);
        assert_eq!(value["speed"], 110);
        assert_eq!(value["severity"], 2);
        assert_eq!(value["roadScore"], 88);
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_calibrating_record_keeps_sentinel() {
        let record = TelemetryRecord { distance: 20.0, speed: 110, severity: -1, road_score: 100 };
        let body = encode_record(&record).unwrap();
        assert!(body.contains("\"severity\":-1"));
    }

    #[test]
    fn test_unreachable_host_counts_failure() {
        // Port 9 on localhost: connection refused without leaving the machine
        let config = HttpConfig::new("http://127.0.0.1:9").timeout_secs(1);
        let mut sink = HttpTelemetrySink::new(config).unwrap();
        let record = TelemetryRecord { distance: 20.0, speed: 170, severity: 0, road_score: 100 };

        assert!(matches!(sink.send(&record), Err(HttpError::Request(_))));
        assert_eq!(sink.stats().messages_failed, 1);
        assert_eq!(sink.stats().messages_sent, 0);
        assert!(sink.stats().last_error.is_some());
    }
}
