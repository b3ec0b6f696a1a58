//! Uplink Normalization Layer
//!
//! ## Overview
//!
//! Uplinks arrive in two wire shapes:
//!
//! - **Network-envelope** ([`envelope`]): the network server's forwarding
//!   format — a nested device-identity block, an uplink-message block with
//!   the decoded sensor payload, and raw reception metadata (gateway list
//!   with embedded location).
//! - **Flat** ([`flat`]): every field at the top level, used by direct and
//!   test submissions.
//!
//! Detection is structural: a payload carrying either envelope marker
//! (`uplink_message` or `end_device_ids`) parses as an envelope, everything
//! else as flat. Both parsers produce the same [`CanonicalUplink`], so the
//! engines never see a wire shape.
//!
//! ## Field Resolution
//!
//! Vendors rename payload keys across firmware revisions, so each canonical
//! field resolves through a priority list of known keys — first non-null
//! wins, then the value is coerced. Coercion failure on the winning key
//! makes the field absent; it does not fall through to a lower-priority key.
//!
//! ## Receive-Time Fallback
//!
//! The wall-clock fallback for a missing or malformed receive timestamp is
//! applied exactly once, in [`normalize`], after shape-specific parsing.
//! Neither shape parser applies it — centralizing the fallback keeps
//! timestamp semantics identical across shapes.

pub mod envelope;
pub mod flat;

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

use crate::{
    constants::physiology::DEFAULT_HUMIDITY_PCT,
    numeric::to_finite,
    time,
};

/// Accelerometer-derived summary carried by one uplink.
///
/// `max_speed_ms`/`mean_speed_ms` pass through to the record unused by
/// classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccelSummary {
    /// Maximum speed over the sampling window (m/s)
    pub max_speed_ms: Option<f64>,
    /// Mean speed over the sampling window (m/s)
    pub mean_speed_ms: Option<f64>,
    /// Overall dynamic body acceleration (g)
    pub odba: Option<f64>,
    /// Vectorial dynamic body acceleration (g)
    pub vedba: Option<f64>,
}

/// Location data carried by one uplink: a lone fix or a batched trajectory.
///
/// Values are coerced but not yet validated — range checks and the no-lock
/// sentinel belong to the trajectory engine.
#[derive(Debug, Clone, PartialEq)]
pub enum GpsInput {
    /// A single fix (either coordinate may be absent)
    Point {
        lat: Option<f64>,
        lon: Option<f64>,
    },
    /// Parallel coordinate/time sequences batched into one uplink.
    /// Times are epoch seconds, pre-parsed by the flexible time parser.
    Track {
        lats: Vec<Option<f64>>,
        lons: Vec<Option<f64>>,
        times: Vec<Option<f64>>,
    },
}

impl Default for GpsInput {
    fn default() -> Self {
        GpsInput::Point {
            lat: None,
            lon: None,
        }
    }
}

/// The normalized representation every engine consumes.
///
/// Every field is independently optional except `humidity_pct`, which always
/// holds a value after normalization, and `received_local`, which always
/// resolves (server receive time, else wall clock). Nothing here is
/// overwritten after normalization.
#[derive(Debug, Clone)]
pub struct CanonicalUplink {
    /// Device identifier; hardware EUI preferred over the network-assigned id
    pub device_key: Option<String>,
    /// Monitored animal id, independent of device identity
    pub subject_id: Option<String>,
    /// Dorsal temperature (°C) as transmitted
    pub body_temp_c: Option<f64>,
    /// Ambient temperature (°C) as transmitted
    pub ambient_temp_c: Option<f64>,
    /// Relative humidity (%), defaulted when the payload omits it
    pub humidity_pct: f64,
    /// Accelerometer summary
    pub accel: AccelSummary,
    /// Location fix or trajectory
    pub gps: GpsInput,
    /// Device-reported epoch seconds; no fallback — absent means time-series
    /// ordering is unavailable for this record
    pub event_epoch: Option<f64>,
    /// Receive time in the deployment zone
    pub received_local: DateTime<FixedOffset>,
}

/// Shape-parser output before the centralized fallbacks are applied
#[derive(Debug, Clone, Default)]
pub(crate) struct ParsedShape {
    pub device_key: Option<String>,
    pub subject_id: Option<String>,
    pub body_temp_c: Option<f64>,
    pub ambient_temp_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub accel: AccelSummary,
    pub gps: GpsInput,
    pub event_epoch: Option<f64>,
    pub received_local: Option<DateTime<FixedOffset>>,
}

/// Normalize one raw uplink body into the canonical record.
///
/// Total function: non-object bodies and unknown fields normalize to a
/// record full of absent values, which the engines then degrade gracefully.
pub fn normalize(body: &Value) -> CanonicalUplink {
    let parsed = match body.as_object() {
        Some(map) if is_envelope(map) => envelope::parse(map),
        Some(map) => flat::parse(map),
        None => {
            log::warn!("uplink body is not a JSON object, normalizing as empty");
            ParsedShape::default()
        }
    };

    CanonicalUplink {
        device_key: parsed.device_key,
        subject_id: parsed.subject_id,
        body_temp_c: parsed.body_temp_c,
        ambient_temp_c: parsed.ambient_temp_c,
        humidity_pct: parsed.humidity_pct.unwrap_or(DEFAULT_HUMIDITY_PCT),
        accel: parsed.accel,
        gps: parsed.gps,
        event_epoch: parsed.event_epoch,
        // Wall-clock fallback happens here and only here
        received_local: parsed.received_local.unwrap_or_else(time::now_local),
    }
}

/// Structural shape detection
fn is_envelope(map: &Map<String, Value>) -> bool {
    map.contains_key("uplink_message") || map.contains_key("end_device_ids")
}

/// First key whose value is present and non-null
pub(crate) fn first_non_null<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
}

/// Resolve a numeric field through its key priority list
pub(crate) fn coerce_field(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    first_non_null(map, keys).and_then(to_finite)
}

/// Resolve an identifier field; numeric ids stringify
pub(crate) fn string_field(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match first_non_null(map, keys)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Build location input from raw latitude/longitude/time values.
///
/// Array-valued coordinates mean the uplink batched a trajectory; anything
/// else is a single fix.
pub(crate) fn location_from(
    lat: Option<&Value>,
    lon: Option<&Value>,
    times: Option<&Value>,
) -> GpsInput {
    let coord_seq = |v: Option<&Value>| -> Option<Vec<Option<f64>>> {
        v.and_then(Value::as_array)
            .map(|arr| arr.iter().map(to_finite).collect())
    };

    if let (Some(lats), Some(lons)) = (coord_seq(lat), coord_seq(lon)) {
        let times = times
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(time::parse_point_time).collect())
            .unwrap_or_default();
        return GpsInput::Track { lats, lons, times };
    }

    GpsInput::Point {
        lat: lat.and_then(to_finite),
        lon: lon.and_then(to_finite),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_markers_select_the_envelope_parser() {
        let with_uplink = json!({"uplink_message": {}});
        let with_ids = json!({"end_device_ids": {"device_id": "collar-7"}});
        let flat = json!({"dev_id": "collar-7"});
        assert!(is_envelope(with_uplink.as_object().unwrap()));
        assert!(is_envelope(with_ids.as_object().unwrap()));
        assert!(!is_envelope(flat.as_object().unwrap()));
    }

    #[test]
    fn non_object_body_normalizes_empty() {
        let up = normalize(&json!([1, 2, 3]));
        assert_eq!(up.device_key, None);
        assert_eq!(up.body_temp_c, None);
        assert_eq!(up.humidity_pct, DEFAULT_HUMIDITY_PCT);
        assert_eq!(up.gps, GpsInput::default());
    }

    #[test]
    fn first_non_null_skips_null_entries() {
        let map = json!({"To_c": null, "temp_body_c": 38.2});
        let map = map.as_object().unwrap();
        assert_eq!(coerce_field(map, &["To_c", "temp_body_c"]), Some(38.2));
    }

    #[test]
    fn winning_key_does_not_fall_through_on_bad_value() {
        // "To_c" wins the priority race; its garbage value makes the field
        // absent rather than falling back to the legacy key
        let map = json!({"To_c": "garbled", "temp_dorsal": 38.2});
        let map = map.as_object().unwrap();
        assert_eq!(coerce_field(map, &["To_c", "temp_dorsal"]), None);
    }

    #[test]
    fn numeric_subject_ids_stringify() {
        let map = json!({"cow_id": 118});
        let map = map.as_object().unwrap();
        assert_eq!(string_field(map, &["cow_id"]), Some("118".into()));
    }

    #[test]
    fn array_coordinates_build_a_track() {
        let lat = json!([4.0, 4.001]);
        let lon = json!([-74.0, -74.0]);
        let times = json!([0, "2023-11-14T22:13:20Z"]);
        let gps = location_from(Some(&lat), Some(&lon), Some(&times));
        match gps {
            GpsInput::Track { lats, lons, times } => {
                assert_eq!(lats, vec![Some(4.0), Some(4.001)]);
                assert_eq!(lons, vec![Some(-74.0), Some(-74.0)]);
                assert_eq!(times, vec![Some(0.0), Some(1_700_000_000.0)]);
            }
            other => panic!("expected track, got {other:?}"),
        }
    }

    #[test]
    fn scalar_coordinates_build_a_point() {
        let lat = json!(4.6);
        let lon = json!("-74.08");
        let gps = location_from(Some(&lat), Some(&lon), None);
        assert_eq!(
            gps,
            GpsInput::Point {
                lat: Some(4.6),
                lon: Some(-74.08)
            }
        );
    }
}
