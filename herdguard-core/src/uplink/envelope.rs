//! Network-envelope shape parser
//!
//! Parses the network server's forwarding format: device identity under
//! `end_device_ids`, the decoded sensor payload under
//! `uplink_message.decoded_payload`, and reception metadata (gateway list)
//! under `uplink_message.rx_metadata`.

use serde_json::{Map, Value};

use super::{coerce_field, location_from, string_field, GpsInput, ParsedShape};
use crate::time;

/// Body-temperature keys in priority order: vendor, generic, legacy
const BODY_TEMP_KEYS: &[&str] = &["To_c", "temp_body_c", "temp_dorsal"];
/// Ambient-temperature keys in priority order
const AMBIENT_TEMP_KEYS: &[&str] = &["Ta_c", "temp_amb_c", "temp_amb"];
/// Humidity keys in priority order
const HUMIDITY_KEYS: &[&str] = &["humedad", "humidity"];

/// Parse one network-envelope uplink into the shape-neutral form
pub(crate) fn parse(body: &Map<String, Value>) -> ParsedShape {
    let uplink = body.get("uplink_message").and_then(Value::as_object);
    let decoded = uplink
        .and_then(|u| u.get("decoded_payload"))
        .and_then(Value::as_object);

    // The hardware EUI survives device re-registration; the network-assigned
    // id does not, so the EUI wins when both are present
    let device_key = body
        .get("end_device_ids")
        .and_then(Value::as_object)
        .and_then(|ids| string_field(ids, &["dev_eui", "device_id"]));

    // Receive time may sit at the body level or inside the uplink message.
    // Malformed stamps resolve to None here; the wall-clock fallback belongs
    // to the central normalizer, not this parser.
    let received_local = body
        .get("received_at")
        .or_else(|| uplink.and_then(|u| u.get("received_at")))
        .and_then(Value::as_str)
        .and_then(time::parse_received_at);

    let empty = Map::new();
    let dec = decoded.unwrap_or(&empty);

    ParsedShape {
        device_key,
        subject_id: string_field(dec, &["cow_id"]),
        body_temp_c: coerce_field(dec, BODY_TEMP_KEYS),
        ambient_temp_c: coerce_field(dec, AMBIENT_TEMP_KEYS),
        humidity_pct: coerce_field(dec, HUMIDITY_KEYS),
        accel: super::AccelSummary {
            max_speed_ms: coerce_field(dec, &["v_max_ms"]),
            mean_speed_ms: coerce_field(dec, &["v_mean_ms"]),
            odba: coerce_field(dec, &["ODBA_g", "ODBA"]),
            vedba: coerce_field(dec, &["VeDBA_g", "VeDBA"]),
        },
        gps: resolve_location(dec, uplink),
        event_epoch: coerce_field(dec, &["epoch_s"]),
        received_local,
    }
}

/// Resolve location from the decoded payload, falling back per-coordinate to
/// the first gateway's reported position.
///
/// The gateway location is where the uplink was *heard*, not where the
/// animal stands — a coarse, approximate substitute used only when the tag
/// sent no fix of its own. Batched trajectories never fall back.
fn resolve_location(dec: &Map<String, Value>, uplink: Option<&Map<String, Value>>) -> GpsInput {
    let lat = super::first_non_null(dec, &["latitude", "lat"]);
    let lon = super::first_non_null(dec, &["longitude", "lon"]);
    let times = super::first_non_null(dec, &["timestamp", "timestamps"]);

    let location = location_from(lat, lon, times);

    match location {
        GpsInput::Point { lat, lon } if lat.is_none() || lon.is_none() => {
            let gateway = first_gateway_location(uplink);
            GpsInput::Point {
                lat: lat.or_else(|| gateway.and_then(|g| g.0)),
                lon: lon.or_else(|| gateway.and_then(|g| g.1)),
            }
        }
        resolved => resolved,
    }
}

/// Location block of the first gateway in the reception metadata
fn first_gateway_location(
    uplink: Option<&Map<String, Value>>,
) -> Option<(Option<f64>, Option<f64>)> {
    let location = uplink?
        .get("rx_metadata")?
        .as_array()?
        .first()?
        .get("location")?
        .as_object()?;
    Some((
        coerce_field(location, &["latitude"]),
        coerce_field(location, &["longitude"]),
    ))
}
