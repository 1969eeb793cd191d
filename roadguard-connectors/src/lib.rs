//! Network Collaborators for the RoadGuard Control Loop
//!
//! ## Overview
//!
//! The core controller reaches the outside world through two traits,
//! `TelemetrySink` and `Connectivity`. This crate implements both for
//! hosted targets (Raspberry Pi class boards, simulators, bench rigs) and
//! adds a settings file loader to wire them up.
//!
//! ### HTTP/HTTPS telemetry
//!
//! **When to use:**
//! - Realtime databases with a REST ingest (Firebase, Supabase)
//! - Dashboards behind a plain JSON endpoint
//! - Development and debugging
//!
//! **Characteristics:**
//! - One POST per reported-state change, JSON body of four fields
//! - Blocking, bounded by a request timeout
//! - At-most-once: failures are counted and reported, never retried
//!
//! ### TCP link probing
//!
//! The controller checks the link before every cycle. `TcpProbeLink` answers
//! from a cached result and re-probes the telemetry host at a fixed interval,
//! so the check stays cheap at 16 Hz.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use roadguard_connectors::settings::DeviceSettings;
//! use roadguard_connectors::{http::HttpTelemetrySink, link::TcpProbeLink};
//!
//! let settings = DeviceSettings::load("roadguard.json")?;
//! let sink = HttpTelemetrySink::new(settings.http_config())?;
//! let link = TcpProbeLink::new(&settings.probe_addr, settings.probe_interval())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(feature = "http")]
pub mod http;

pub mod link;
pub mod settings;

// Re-export common types
#[cfg(feature = "http")]
pub use http::{AuthMethod, HttpConfig, HttpError, HttpTelemetrySink};
pub use link::{LinkError, TcpProbeLink};
pub use settings::{DeviceSettings, SettingsError};

/// Delivery statistics common to all sinks
#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    /// Total records delivered
    pub messages_sent: u64,
    /// Total records that failed to deliver
    pub messages_failed: u64,
    /// Total body bytes sent
    pub bytes_sent: u64,
    /// Last error message
    pub last_error: Option<String>,
}

impl ConnectionStats {
    fn record_success(&mut self, bytes: usize) {
        self.messages_sent += 1;
        self.bytes_sent += bytes as u64;
    }

    fn record_failure(&mut self, error: impl ToString) {
        self.messages_failed += 1;
        self.last_error = Some(error.to_string());
    }
}
