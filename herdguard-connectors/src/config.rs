//! Publish configuration and device-token resolution
//!
//! Resolved once at process start from the environment and treated as
//! read-only afterwards. Token resolution is multi-tenant capable: an
//! optional per-device table consulted first, then a global default token.
//! A device that resolves no token at all is rejected at the ingest
//! boundary rather than silently dropping its telemetry.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use thiserror::Error;

/// Environment variable naming the dashboard base URL
pub const ENV_BASE_URL: &str = "TELEMETRY_BASE";
/// Environment variable naming the global default device token
pub const ENV_DEFAULT_TOKEN: &str = "TELEMETRY_TOKEN";
/// Environment variable carrying per-device tokens (`dev1=tok1,dev2=tok2`)
pub const ENV_DEVICE_TOKENS: &str = "TELEMETRY_DEVICE_TOKENS";

/// Configuration failures at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required variable absent or empty
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    /// Device-token list entry is not `device=token`
    #[error("malformed device-token entry: {0}")]
    MalformedTokenEntry(String),
}

/// Publisher configuration
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Dashboard base URL (scheme + host)
    pub base_url: String,
    /// Per-request timeout; publishes are best-effort and short
    pub timeout: Duration,
    /// Retry attempts after the first failure (5xx/429 only)
    pub max_retries: u32,
    /// User agent sent with each request
    pub user_agent: String,
}

impl PublishConfig {
    /// Create a configuration with the default timeout and retry policy
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(5),
            max_retries: 2,
            user_agent: format!("HerdGuard/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the per-request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the retry budget
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Resolve the configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = env::var(ENV_BASE_URL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENV_BASE_URL))?;
        Ok(Self::new(base.trim().to_owned()))
    }
}

/// Read-only device-token table resolved at startup
#[derive(Debug, Clone, Default)]
pub struct TokenTable {
    /// Global fallback token
    default_token: Option<String>,
    /// Per-device tokens, keyed by device identifier
    device_tokens: HashMap<String, String>,
}

impl TokenTable {
    /// Table with only a global token (single-tenant deployment)
    pub fn single(token: impl Into<String>) -> Self {
        Self {
            default_token: Some(token.into()),
            device_tokens: HashMap::new(),
        }
    }

    /// Table with per-device tokens and an optional global fallback
    pub fn new(
        device_tokens: HashMap<String, String>,
        default_token: Option<String>,
    ) -> Self {
        Self {
            default_token,
            device_tokens,
        }
    }

    /// Resolve the environment's token settings.
    ///
    /// Reads the optional global token and the optional `dev=token` list;
    /// both absent yields an empty table that resolves nothing.
    pub fn from_env() -> Result<Self, ConfigError> {
        let default_token = env::var(ENV_DEFAULT_TOKEN)
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty());

        let mut device_tokens = HashMap::new();
        if let Ok(raw) = env::var(ENV_DEVICE_TOKENS) {
            for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
                let (device, token) = entry
                    .split_once('=')
                    .ok_or_else(|| ConfigError::MalformedTokenEntry(entry.to_owned()))?;
                let (device, token) = (device.trim(), token.trim());
                if device.is_empty() || token.is_empty() {
                    return Err(ConfigError::MalformedTokenEntry(entry.to_owned()));
                }
                device_tokens.insert(device.to_owned(), token.to_owned());
            }
        }

        Ok(Self {
            default_token,
            device_tokens,
        })
    }

    /// Look up the publish token for a device.
    ///
    /// Per-device mapping wins; the global token covers the rest. `None`
    /// means the deployment has no credentials for this device and the
    /// uplink must be rejected, not silently dropped.
    pub fn resolve(&self, device_key: Option<&str>) -> Option<&str> {
        device_key
            .and_then(|key| self.device_tokens.get(key))
            .or(self.default_token.as_ref())
            .map(String::as_str)
    }
}
