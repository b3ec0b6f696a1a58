//! Receive-Time Resolution and Flexible Timestamp Parsing
//!
//! ## Overview
//!
//! Two distinct time problems live here:
//!
//! 1. **Record time**: the network server stamps each uplink with an
//!    ISO-8601 UTC `received_at`. Dashboards and herd managers work in the
//!    deployment's local zone, so that stamp is converted to a fixed local
//!    offset. When the stamp is missing or malformed, wall-clock time of
//!    processing substitutes — resolved exactly once per uplink, centrally
//!    in the normalizer, so both wire shapes share identical semantics.
//!
//! 2. **Per-point trajectory time**: batched GPS points carry their own
//!    timestamps in whatever form the encoder chose — numeric epoch seconds,
//!    numeric strings, or ISO-8601 with `Z` meaning UTC. These parse
//!    flexibly; anything unparseable becomes "no value" and is repaired by
//!    the trajectory engine's ordering pass.
//!
//! The deployment zone is UTC−05:00 with no daylight saving, so a fixed
//! offset is exact and avoids a timezone-database dependency.

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;

use crate::numeric;

/// Deployment-zone offset from UTC in seconds (UTC−05:00, no DST)
pub const LOCAL_UTC_OFFSET_SECS: i32 = -5 * 3600;

/// The fixed local offset of the herd deployment zone
pub fn local_offset() -> FixedOffset {
    // Offset literal is statically valid
    FixedOffset::east_opt(LOCAL_UTC_OFFSET_SECS).unwrap()
}

/// Current wall-clock time in the deployment zone
pub fn now_local() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&local_offset())
}

/// Parse a network-server receive timestamp into local time.
///
/// Accepts RFC 3339 / ISO-8601 with either `Z` or a numeric offset.
/// Returns `None` on malformed input; the caller applies the wall-clock
/// fallback.
pub fn parse_received_at(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&local_offset()))
}

/// Parse one trajectory point's timestamp into epoch seconds.
///
/// Accepts a numeric epoch (seconds, fractional allowed), a numeric string,
/// or an ISO-8601 string (`Z` = UTC). Everything else is "no value".
pub fn parse_point_time(value: &Value) -> Option<f64> {
    if let Some(epoch) = numeric::to_finite(value) {
        return Some(epoch);
    }
    if let Value::String(s) = value {
        return DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.timestamp_millis() as f64 / 1000.0);
    }
    None
}
