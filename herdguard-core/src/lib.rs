//! Core normalization and derived-metrics engine for HerdGuard
//!
//! Turns raw LoRaWAN telemetry uplinks from cattle-mounted sensor tags into
//! enriched dashboard records: thermal state (estrus detection), activity
//! level, and movement metrics.
//!
//! Key constraints:
//! - One uplink at a time, no cross-request state
//! - Total at every boundary: corrupted field data degrades, never fails
//! - Engine outputs carry the dashboard's exact wire keys and precision
//!
//! ```no_run
//! use herdguard_core::UplinkProcessor;
//! use serde_json::json;
//!
//! let processor = UplinkProcessor::without_model();
//!
//! let record = processor.process(&json!({
//!     "dev_id": "collar-7",
//!     "temp_body_c": 38.9,
//!     "temp_amb_c": 27.5,
//!     "VeDBA_g": 0.4,
//! }));
//! assert_eq!(record.device_key.as_deref(), Some("collar-7"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod engines;
pub mod errors;
pub mod numeric;
pub mod record;
pub mod time;
pub mod uplink;

// Public API
pub use engines::{
    ActivityEngine, ActivityLevel, ActivityReport, BaselineModel, TemperatureEngine,
    ThermalReport, ThermalState, TrackReport, TrajectoryEngine,
};
pub use record::{derive_overall, OverallState, ProcessedRecord, UplinkProcessor};
pub use uplink::{normalize, AccelSummary, CanonicalUplink, GpsInput};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
