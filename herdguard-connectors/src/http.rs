//! HTTP telemetry publisher
//!
//! Delivers finished records to the dashboard's device-token REST endpoint:
//! `POST {base}/api/v1/{token}/telemetry` with a JSON body. Built on the
//! lightweight blocking `ureq` client wrapped in `spawn_blocking`, so the
//! async ingest path never blocks a runtime worker.
//!
//! Delivery is best-effort: a short per-request timeout, a small retry
//! budget with exponential backoff for server errors and rate limits, and
//! no retry at all for client errors (a bad token does not improve by
//! retrying).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::{config::PublishConfig, PublishStats, TelemetrySink};

/// Publisher errors
#[derive(Debug, Error)]
pub enum PublishError {
    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Network or transport failure
    #[error("request failed: {0}")]
    Request(String),

    /// Server rejected the record
    #[error("server error {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body, when readable
        message: String,
    },

    /// Record could not be serialized
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Best-effort HTTP publisher
#[derive(Clone)]
pub struct HttpPublisher {
    config: PublishConfig,
    agent: ureq::Agent,
    stats: Arc<Mutex<PublishStats>>,
}

impl HttpPublisher {
    /// Create a publisher, validating the base URL
    pub fn new(config: PublishConfig) -> Result<Self, PublishError> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(PublishError::Config(
                "base URL must start with http:// or https://".into(),
            ));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            config,
            agent,
            stats: Arc::new(Mutex::new(PublishStats::default())),
        })
    }

    /// Telemetry endpoint for a device token
    fn telemetry_url(&self, device_token: &str) -> String {
        format!(
            "{}/api/v1/{}/telemetry",
            self.config.base_url.trim_end_matches('/'),
            device_token
        )
    }

    /// Deliver one serialized record, retrying transient failures.
    ///
    /// Runs on a blocking thread; the backoff sleep is a plain thread sleep.
    fn send_blocking(&self, device_token: &str, body: &str) -> Result<(), PublishError> {
        let url = self.telemetry_url(device_token);
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                std::thread::sleep(Duration::from_millis(100 * (1 << attempt)));
            }

            let response = self
                .agent
                .post(&url)
                .set("Content-Type", "application/json")
                .send_string(body);

            match response {
                Ok(_) => {
                    let mut stats = self.lock_stats();
                    stats.records_sent += 1;
                    return Ok(());
                }
                Err(ureq::Error::Status(code, resp)) => {
                    let message = resp.into_string().unwrap_or_default();
                    let error = PublishError::Server {
                        status: code,
                        message,
                    };
                    // 5xx and rate limits are worth retrying; 4xx is not
                    if code >= 500 || code == 429 {
                        last_error = Some(error);
                        continue;
                    }
                    self.record_failure(&error);
                    return Err(error);
                }
                Err(ureq::Error::Transport(e)) => {
                    last_error = Some(PublishError::Request(e.to_string()));
                    continue;
                }
            }
        }

        let error =
            last_error.unwrap_or_else(|| PublishError::Request("retries exhausted".into()));
        self.record_failure(&error);
        Err(error)
    }

    fn record_failure(&self, error: &PublishError) {
        let mut stats = self.lock_stats();
        stats.records_failed += 1;
        stats.last_error = Some(error.to_string());
    }

    fn lock_stats(&self) -> std::sync::MutexGuard<'_, PublishStats> {
        // A poisoned stats mutex only ever holds counters; keep counting
        self.stats
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl TelemetrySink for HttpPublisher {
    async fn publish(&self, device_token: &str, record: &Value) -> Result<(), PublishError> {
        let body = serde_json::to_string(record)
            .map_err(|e| PublishError::Serialization(e.to_string()))?;

        let publisher = self.clone();
        let token = device_token.to_owned();
        tokio::task::spawn_blocking(move || publisher.send_blocking(&token, &body))
            .await
            .map_err(|e| PublishError::Request(format!("publish task failed: {e}")))?
    }

    fn stats(&self) -> PublishStats {
        self.lock_stats().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_base_url() {
        assert!(HttpPublisher::new(PublishConfig::new("dash.example.com")).is_err());
        assert!(HttpPublisher::new(PublishConfig::new("https://dash.example.com")).is_ok());
    }

    #[test]
    fn telemetry_url_embeds_the_device_token() {
        let publisher = HttpPublisher::new(PublishConfig::new("https://dash.example.com")).unwrap();
        assert_eq!(
            publisher.telemetry_url("tok-7"),
            "https://dash.example.com/api/v1/tok-7/telemetry"
        );
    }

    #[test]
    fn trailing_slash_does_not_double_up() {
        let publisher =
            HttpPublisher::new(PublishConfig::new("https://dash.example.com/")).unwrap();
        assert_eq!(
            publisher.telemetry_url("tok"),
            "https://dash.example.com/api/v1/tok/telemetry"
        );
    }

    #[test]
    fn stats_start_at_zero() {
        let publisher = HttpPublisher::new(PublishConfig::new("https://dash.example.com")).unwrap();
        let stats = TelemetrySink::stats(&publisher);
        assert_eq!(stats.records_sent, 0);
        assert_eq!(stats.records_failed, 0);
        assert!(stats.last_error.is_none());
    }
}
