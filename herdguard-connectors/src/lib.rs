//! Dashboard Connectors for HerdGuard
//!
//! ## Overview
//!
//! Everything that touches the network lives here, keeping the core engine
//! pure. Two halves:
//!
//! - [`http`] — the outbound telemetry publisher. Best-effort delivery to a
//!   dashboard's device-token REST endpoint with a short timeout and bounded
//!   retry. A publish failure is logged and dropped; it never affects the
//!   response already computed for the inbound uplink.
//! - [`ingest`] — the inbound boundary glue. Takes one parsed JSON body,
//!   runs the core pipeline, spawns a detached publish task, and returns the
//!   acknowledgement the web layer serializes back to the network server.
//!   Route registration itself stays outside this crate.
//!
//! ## Delivery Contract
//!
//! The upstream network server re-delivers uplinks it believes failed, so
//! the ingest boundary acknowledges everything structurally parseable —
//! acknowledge-then-diagnose, never an error status that triggers endless
//! retries.
//!
//! ## Why Fire-and-Forget?
//!
//! Publish and respond are decoupled: the dashboard being down must not
//! back-pressure the LoRaWAN ingestion path. Each publish runs detached on
//! the runtime with its own timeout/retry policy and reports only to the
//! log.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod http;
pub mod ingest;

pub use config::{ConfigError, PublishConfig, TokenTable};
pub use http::{HttpPublisher, PublishError};
pub use ingest::{Ack, IngestService};

use serde_json::Value;

/// Delivery statistics common to all publishers
#[derive(Debug, Default, Clone)]
pub struct PublishStats {
    /// Records delivered successfully
    pub records_sent: u64,
    /// Records that exhausted retries
    pub records_failed: u64,
    /// Last failure message, if any
    pub last_error: Option<String>,
}

/// Outbound telemetry sink.
///
/// The seam between the ingest glue and the transport: production uses
/// [`HttpPublisher`]; tests substitute an in-memory sink.
#[async_trait::async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Deliver one record under the given device token
    async fn publish(&self, device_token: &str, record: &Value) -> Result<(), PublishError>;

    /// Delivery statistics so far
    fn stats(&self) -> PublishStats;
}
