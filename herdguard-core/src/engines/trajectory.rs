//! Trajectory calculator for GPS fixes
//!
//! Computes great-circle path distance, mean speed, and path straightness
//! from one or many location samples carried in a single uplink. There is no
//! cross-uplink state: a batch of points is a trajectory, a lone fix is a
//! position with zero path.
//!
//! Field GPS data is the least trustworthy input in the system:
//! - (0, 0) is the standard no-satellite-lock sentinel and is discarded
//! - per-point timestamps arrive missing, duplicated, or out of order
//! - coordinates arrive as strings, nulls, or out-of-range garbage
//!
//! The engine is a total function. Every malformed shape degrades to the
//! same all-absent report with zero distance/speed and straightness 1; no
//! input can propagate a failure past the engine boundary.

use serde::Serialize;

use crate::{
    constants::geo::{
        EARTH_RADIUS_M, LATITUDE_MAX_DEG, LONGITUDE_MAX_DEG, MAX_PLAUSIBLE_SPEED_M_PER_S,
        NO_FIX_EPSILON_DEG,
    },
    numeric::{clamp, round2},
    uplink::GpsInput,
};

/// Pure output of the trajectory calculator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackReport {
    /// Latitude of the last valid fix (degrees)
    pub lat: Option<f64>,
    /// Longitude of the last valid fix (degrees)
    pub lon: Option<f64>,
    /// Total path distance (m)
    #[serde(rename = "distancia")]
    pub distance_m: f64,
    /// Mean speed over the trajectory (m/s)
    #[serde(rename = "velocidad")]
    pub speed_m_per_s: f64,
    /// Net displacement over path distance, in [0, 1]
    #[serde(rename = "rectitud")]
    pub straightness: f64,
}

impl TrackReport {
    /// Report for an uplink with no usable fix. A lone fix defines no path,
    /// so the defaults are distance 0, speed 0, straightness 1.
    fn no_fix() -> Self {
        Self {
            lat: None,
            lon: None,
            distance_m: 0.0,
            speed_m_per_s: 0.0,
            straightness: 1.0,
        }
    }
}

/// Great-circle distance between two (lat, lon) points in meters
pub fn haversine_m(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Trajectory calculator with plausibility limits
#[derive(Debug, Clone)]
pub struct TrajectoryEngine {
    /// Mean speeds above this are corrupted data and reset to 0
    max_speed_m_per_s: f64,
}

impl Default for TrajectoryEngine {
    fn default() -> Self {
        Self {
            max_speed_m_per_s: MAX_PLAUSIBLE_SPEED_M_PER_S,
        }
    }
}

impl TrajectoryEngine {
    /// Create an engine with a custom speed cap
    pub fn new_with_speed_cap(max_speed_m_per_s: f64) -> Self {
        Self {
            max_speed_m_per_s: max_speed_m_per_s.abs(),
        }
    }

    /// Analyze one uplink's location data
    pub fn analyze(&self, gps: &GpsInput) -> TrackReport {
        match gps {
            GpsInput::Point { lat, lon } => match valid_point(*lat, *lon) {
                Some((lat, lon)) => TrackReport {
                    lat: Some(lat),
                    lon: Some(lon),
                    ..TrackReport::no_fix()
                },
                None => TrackReport::no_fix(),
            },
            GpsInput::Track { lats, lons, times } => self.analyze_track(lats, lons, times),
        }
    }

    fn analyze_track(
        &self,
        lats: &[Option<f64>],
        lons: &[Option<f64>],
        times: &[Option<f64>],
    ) -> TrackReport {
        // Parallel sequences that do not line up are a malformed frame
        if lats.is_empty() || lats.len() != lons.len() {
            return TrackReport::no_fix();
        }

        // Keep each point's timestamp only while the point itself survives
        let mut points: Vec<(f64, f64)> = Vec::with_capacity(lats.len());
        let mut stamps: Vec<Option<f64>> = Vec::with_capacity(lats.len());
        for i in 0..lats.len() {
            if let Some(p) = valid_point(lats[i], lons[i]) {
                points.push(p);
                stamps.push(times.get(i).copied().flatten().filter(|t| t.is_finite()));
            }
        }

        if points.is_empty() {
            return TrackReport::no_fix();
        }

        let times = repair_times(&stamps);
        let n = points.len();

        let distance_m: f64 = points.windows(2).map(|w| haversine_m(w[0], w[1])).sum();

        let duration_s = (times[n - 1] - times[0]).max(0.0);
        let mut speed = if duration_s > 0.0 {
            distance_m / duration_s
        } else {
            0.0
        };
        if speed > self.max_speed_m_per_s {
            log::warn!(
                "implausible mean speed {speed:.1} m/s over {n} fixes, resetting to 0"
            );
            speed = 0.0;
        }

        let net_m = haversine_m(points[0], points[n - 1]);
        let straightness = if distance_m > 0.0 {
            clamp(net_m / distance_m, 0.0, 1.0)
        } else {
            1.0
        };

        let (lat, lon) = points[n - 1];
        TrackReport {
            lat: Some(lat),
            lon: Some(lon),
            distance_m: round2(distance_m),
            speed_m_per_s: round2(speed),
            straightness: round2(straightness),
        }
    }
}

/// Validate one coordinate pair, discarding the no-lock sentinel
fn valid_point(lat: Option<f64>, lon: Option<f64>) -> Option<(f64, f64)> {
    let (lat, lon) = (lat?, lon?);
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    if lat.abs() > LATITUDE_MAX_DEG || lon.abs() > LONGITUDE_MAX_DEG {
        log::warn!("coordinates ({lat}, {lon}) outside valid range, discarding fix");
        return None;
    }
    // (0, 0) means the receiver had no satellite lock
    if lat.abs() < NO_FIX_EPSILON_DEG && lon.abs() < NO_FIX_EPSILON_DEG {
        return None;
    }
    Some((lat, lon))
}

/// Repair a per-point time sequence into a non-decreasing one.
///
/// When nothing parsed at all, point index substitutes as synthetic
/// monotonic time. Otherwise missing stamps forward-fill from the previous
/// point (0 for the first), and a backward scan clamps any stamp exceeding
/// its successor — ordering is repaired without discarding points.
fn repair_times(stamps: &[Option<f64>]) -> Vec<f64> {
    if stamps.iter().all(Option::is_none) {
        return (0..stamps.len()).map(|i| i as f64).collect();
    }

    let mut times = Vec::with_capacity(stamps.len());
    let mut prev = 0.0;
    for stamp in stamps {
        let t = stamp.unwrap_or(prev);
        times.push(t);
        prev = t;
    }
    for i in (0..times.len().saturating_sub(1)).rev() {
        if times[i] > times[i + 1] {
            times[i] = times[i + 1];
        }
    }
    times
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(points: &[(f64, f64)], times: &[Option<f64>]) -> GpsInput {
        GpsInput::Track {
            lats: points.iter().map(|p| Some(p.0)).collect(),
            lons: points.iter().map(|p| Some(p.1)).collect(),
            times: times.to_vec(),
        }
    }

    #[test]
    fn haversine_known_distance() {
        // One degree of latitude along a meridian is ~111.2 km
        let d = haversine_m((4.0, -74.0), (5.0, -74.0));
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
        // zero distance for identical points
        assert_eq!(haversine_m((4.5, -74.1), (4.5, -74.1)), 0.0);
    }

    #[test]
    fn single_valid_fix_has_no_path() {
        let engine = TrajectoryEngine::default();
        let report = engine.analyze(&GpsInput::Point {
            lat: Some(4.6),
            lon: Some(-74.08),
        });
        assert_eq!(report.lat, Some(4.6));
        assert_eq!(report.lon, Some(-74.08));
        assert_eq!(report.distance_m, 0.0);
        assert_eq!(report.speed_m_per_s, 0.0);
        assert_eq!(report.straightness, 1.0);
    }

    #[test]
    fn invalid_single_fix_degrades_with_same_defaults() {
        let engine = TrajectoryEngine::default();
        for gps in [
            GpsInput::Point { lat: None, lon: Some(-74.0) },
            GpsInput::Point { lat: Some(95.0), lon: Some(-74.0) },
            GpsInput::Point { lat: Some(4.0), lon: Some(181.0) },
            GpsInput::Point { lat: Some(0.0), lon: Some(0.0) },
        ] {
            let report = engine.analyze(&gps);
            assert_eq!(report, TrackReport::no_fix(), "input {gps:?}");
        }
    }

    #[test]
    fn no_lock_sentinel_discarded_inside_track() {
        let engine = TrajectoryEngine::default();
        let gps = track(
            &[(4.0, -74.0), (0.0, 0.0), (4.001, -74.0)],
            &[Some(0.0), Some(60.0), Some(120.0)],
        );
        let report = engine.analyze(&gps);
        // the sentinel contributes neither distance nor a detour
        let expected = haversine_m((4.0, -74.0), (4.001, -74.0));
        assert!((report.distance_m - round2(expected)).abs() < 0.01);
        assert_eq!(report.straightness, 1.0);
    }

    #[test]
    fn identical_points_give_zero_distance_full_straightness() {
        let engine = TrajectoryEngine::default();
        let gps = track(&[(4.5, -74.0), (4.5, -74.0)], &[Some(0.0), Some(30.0)]);
        let report = engine.analyze(&gps);
        assert_eq!(report.distance_m, 0.0);
        assert_eq!(report.speed_m_per_s, 0.0);
        // 0/0 path ratio is defined as perfectly straight
        assert_eq!(report.straightness, 1.0);
    }

    #[test]
    fn collinear_track_is_straight() {
        let engine = TrajectoryEngine::default();
        let gps = track(
            &[(4.0, -74.0), (4.001, -74.0), (4.002, -74.0)],
            &[Some(0.0), Some(120.0), Some(240.0)],
        );
        let report = engine.analyze(&gps);
        assert!((report.straightness - 1.0).abs() <= 0.01, "{report:?}");
    }

    #[test]
    fn round_trip_track_has_zero_straightness() {
        let engine = TrajectoryEngine::default();
        let gps = track(
            &[(4.0, -74.0), (4.002, -74.0), (4.0, -74.0)],
            &[Some(0.0), Some(300.0), Some(600.0)],
        );
        let report = engine.analyze(&gps);
        assert!(report.straightness <= 0.01, "{report:?}");
        assert_eq!(report.lat, Some(4.0));
    }

    #[test]
    fn mean_speed_from_distance_and_duration() {
        let engine = TrajectoryEngine::default();
        // ~111.2 m over 60 s is ~1.85 m/s
        let gps = track(&[(4.0, -74.0), (4.001, -74.0)], &[Some(0.0), Some(60.0)]);
        let report = engine.analyze(&gps);
        assert!((report.speed_m_per_s - 1.85).abs() < 0.05, "{report:?}");
    }

    #[test]
    fn implausible_speed_resets_to_zero() {
        let engine = TrajectoryEngine::default();
        // ~111 km in 60 s
        let gps = track(&[(4.0, -74.0), (5.0, -74.0)], &[Some(0.0), Some(60.0)]);
        let report = engine.analyze(&gps);
        assert_eq!(report.speed_m_per_s, 0.0);
        // distance itself is still reported
        assert!(report.distance_m > 100_000.0);
    }

    #[test]
    fn zero_duration_means_zero_speed() {
        let engine = TrajectoryEngine::default();
        let gps = track(&[(4.0, -74.0), (4.001, -74.0)], &[Some(60.0), Some(60.0)]);
        let report = engine.analyze(&gps);
        assert_eq!(report.speed_m_per_s, 0.0);
    }

    #[test]
    fn missing_times_fall_back_to_point_index() {
        let engine = TrajectoryEngine::default();
        // two points, no parseable times: synthetic duration is 1 "second"
        let gps = track(&[(4.0, -74.0), (4.0001, -74.0)], &[None, None]);
        let report = engine.analyze(&gps);
        // ~11.1 m over 1 unit
        assert!((report.speed_m_per_s - 11.12).abs() < 0.1, "{report:?}");
    }

    #[test]
    fn regressing_times_clamp_to_non_decreasing() {
        // 100, 40, 80 → backward scan yields 40, 40, 80
        assert_eq!(
            repair_times(&[Some(100.0), Some(40.0), Some(80.0)]),
            vec![40.0, 40.0, 80.0]
        );
        // missing stamps forward-fill before the scan
        assert_eq!(
            repair_times(&[None, Some(10.0), None]),
            vec![0.0, 10.0, 10.0]
        );
    }

    #[test]
    fn regressing_times_shrink_duration() {
        let engine = TrajectoryEngine::default();
        let gps = track(
            &[(4.0, -74.0), (4.001, -74.0), (4.002, -74.0)],
            &[Some(200.0), Some(100.0), Some(220.0)],
        );
        // repaired to 100, 100, 220 → duration 120 s
        let report = engine.analyze(&gps);
        let expected = report.distance_m / 120.0;
        assert!((report.speed_m_per_s - round2(expected)).abs() < 0.01, "{report:?}");
    }

    #[test]
    fn mismatched_parallel_arrays_degrade() {
        let engine = TrajectoryEngine::default();
        let gps = GpsInput::Track {
            lats: vec![Some(4.0), Some(4.001)],
            lons: vec![Some(-74.0)],
            times: vec![],
        };
        assert_eq!(engine.analyze(&gps), TrackReport::no_fix());
    }

    #[test]
    fn times_length_mismatch_is_tolerated() {
        let engine = TrajectoryEngine::default();
        // times array shorter than points: missing entries repair as absent
        let gps = GpsInput::Track {
            lats: vec![Some(4.0), Some(4.001)],
            lons: vec![Some(-74.0), Some(-74.0)],
            times: vec![Some(0.0)],
        };
        let report = engine.analyze(&gps);
        assert!(report.lat.is_some());
        // forward-fill gives both points t=0 → zero duration → zero speed
        assert_eq!(report.speed_m_per_s, 0.0);
    }

    #[test]
    fn all_points_invalid_degrades() {
        let engine = TrajectoryEngine::default();
        let gps = track(&[(0.0, 0.0), (200.0, 200.0)], &[None, None]);
        assert_eq!(engine.analyze(&gps), TrackReport::no_fix());
    }
}
