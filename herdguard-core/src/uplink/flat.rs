//! Flat shape parser
//!
//! Parses direct/test submissions where every field sits at the top level.
//! Flat uplinks carry no server receive stamp — the record timestamp always
//! comes from the central wall-clock fallback.

use serde_json::{Map, Value};

use super::{coerce_field, first_non_null, location_from, string_field, AccelSummary, ParsedShape};

/// Parse one flat uplink into the shape-neutral form
pub(crate) fn parse(body: &Map<String, Value>) -> ParsedShape {
    ParsedShape {
        device_key: string_field(body, &["dev_id"]),
        subject_id: string_field(body, &["cow_id"]),
        body_temp_c: coerce_field(body, &["temp_body_c", "temp_dorsal"]),
        ambient_temp_c: coerce_field(body, &["temp_amb_c", "temp_amb"]),
        humidity_pct: coerce_field(body, &["humedad", "humidity"]),
        accel: AccelSummary {
            max_speed_ms: coerce_field(body, &["v_max_ms"]),
            mean_speed_ms: coerce_field(body, &["v_mean_ms"]),
            odba: coerce_field(body, &["ODBA_g", "ODBA"]),
            vedba: coerce_field(body, &["VeDBA_g", "VeDBA"]),
        },
        gps: location_from(
            first_non_null(body, &["lat", "latitude"]),
            first_non_null(body, &["lon", "longitude"]),
            first_non_null(body, &["timestamp", "timestamps"]),
        ),
        event_epoch: coerce_field(body, &["ts_epoch"]),
        received_local: None,
    }
}
