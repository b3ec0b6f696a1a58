//! Ingest boundary glue
//!
//! The single entry point a web layer calls per uplink: run the core
//! pipeline, kick off a detached publish, acknowledge. The HTTP route
//! itself lives outside this crate — whatever framework hosts the service
//! deserializes the body, calls [`IngestService::handle`], and serializes
//! the returned [`Ack`].
//!
//! Acknowledgement policy: every structurally parseable uplink acknowledges
//! `ok: true`, including ones whose sensor data degraded to "no data"
//! outputs — the upstream network server must never be provoked into
//! endless redelivery. The only rejection is a device with no resolvable
//! publish credentials, reported in the payload, not as a transport error.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use herdguard_core::{ProcessedRecord, UplinkProcessor};

use crate::{config::TokenTable, TelemetrySink};

/// Acknowledgement returned to the ingest route
#[derive(Debug, Clone, Serialize)]
pub struct Ack {
    /// Whether the uplink was accepted for publishing
    pub ok: bool,
    /// The processed record, present on acceptance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ProcessedRecord>,
    /// Rejection reason, present on rejection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Ack {
    /// Acknowledge acceptance with the processed record
    fn accepted(record: ProcessedRecord) -> Self {
        Self {
            ok: true,
            data: Some(record),
            error: None,
        }
    }

    /// Acknowledge rejection with a payload-level reason
    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(reason.into()),
        }
    }
}

/// Per-uplink ingest pipeline: process, publish detached, acknowledge
pub struct IngestService {
    processor: UplinkProcessor,
    sink: Arc<dyn TelemetrySink>,
    tokens: TokenTable,
}

impl IngestService {
    /// Assemble the service from its collaborators
    pub fn new(processor: UplinkProcessor, sink: Arc<dyn TelemetrySink>, tokens: TokenTable) -> Self {
        Self {
            processor,
            sink,
            tokens,
        }
    }

    /// Handle one uplink body.
    ///
    /// The publish task is spawned detached with its own timeout and retry
    /// policy; its outcome lands in the log, never in the acknowledgement.
    pub async fn handle(&self, body: &Value) -> Ack {
        let record = self.processor.process(body);

        let Some(token) = self.tokens.resolve(record.device_key.as_deref()) else {
            log::warn!(
                "no publish credentials for device {:?}, rejecting uplink",
                record.device_key
            );
            return Ack::rejected(format!(
                "no publish credentials for device {}",
                record.device_key.as_deref().unwrap_or("<unknown>")
            ));
        };
        let token = token.to_owned();

        match serde_json::to_value(&record) {
            Ok(payload) => {
                let sink = Arc::clone(&self.sink);
                tokio::spawn(async move {
                    if let Err(e) = sink.publish(&token, &payload).await {
                        log::warn!("telemetry publish failed: {e}");
                    }
                });
            }
            Err(e) => log::warn!("record serialization failed, publish skipped: {e}"),
        }

        Ack::accepted(record)
    }

    /// Liveness payload for a health route
    pub fn health(&self) -> Value {
        json!({
            "ok": true,
            "service": "herdguard",
            "version": herdguard_core::VERSION,
        })
    }
}
