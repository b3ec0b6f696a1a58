//! Outbound Record Assembly
//!
//! ## Overview
//!
//! The assembler merges one uplink's identifiers, resolved timestamps, and
//! the three engine reports into the flat record the dashboard ingests, and
//! derives the composite alert flag. The three report groups carry disjoint
//! wire keys and merge via `#[serde(flatten)]` — a named struct-of-structs
//! merge, so a new field colliding across groups is a compile-visible schema
//! change, not a silent overwrite.
//!
//! ## Composite Alert
//!
//! `estado_general` escalates to an estrus alert only when two independent
//! signals agree: thermal state `posible_celo` *and* activity `alta`
//! (estrus restlessness). Any other combination passes the thermal state
//! through verbatim.
//!
//! [`UplinkProcessor`] is the single entry point external collaborators
//! call: raw JSON body in, assembled record out, no failure path.

use serde::Serialize;
use serde_json::Value;

use chrono::Timelike;

use std::sync::Arc;

use crate::{
    engines::{
        ActivityEngine, ActivityLevel, ActivityReport, BaselineModel, TemperatureEngine,
        ThermalReport, ThermalState, TrackReport, TrajectoryEngine,
    },
    uplink,
};

/// Composite alert state for the assembled record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallState {
    /// Thermal and activity signals both indicate estrus
    EstrusAlert,
    /// No escalation; the thermal state passes through
    Thermal(ThermalState),
    /// No thermal assessment was available
    Unknown,
}

impl OverallState {
    /// Wire-contract name of the state
    pub const fn as_str(&self) -> &'static str {
        match self {
            OverallState::EstrusAlert => "alerta_celo",
            OverallState::Thermal(state) => state.as_str(),
            OverallState::Unknown => "desconocido",
        }
    }
}

impl Serialize for OverallState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Derive the composite alert from the two independent signals
pub fn derive_overall(
    thermal: Option<ThermalState>,
    activity: Option<ActivityLevel>,
) -> OverallState {
    match (thermal, activity) {
        (Some(ThermalState::PossibleEstrus), Some(ActivityLevel::High)) => {
            OverallState::EstrusAlert
        }
        (Some(state), _) => OverallState::Thermal(state),
        (None, _) => OverallState::Unknown,
    }
}

/// The enriched record handed to the publisher.
///
/// Serializes to the dashboard's flat key set; the engine groups flatten in
/// with their own wire names.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedRecord {
    /// Receive time in the deployment zone, ISO-8601
    pub timestamp_local: String,
    /// Device identifier
    #[serde(rename = "dev_id")]
    pub device_key: Option<String>,
    /// Monitored animal identifier
    #[serde(rename = "cow_id")]
    pub subject_id: Option<String>,
    /// Device-reported event epoch (seconds); null when the device sent none
    #[serde(rename = "ts_epoch")]
    pub event_epoch: Option<f64>,
    /// Thermal classifier output
    #[serde(flatten)]
    pub thermal: ThermalReport,
    /// Activity classifier output
    #[serde(flatten)]
    pub activity: ActivityReport,
    /// Trajectory calculator output
    #[serde(flatten)]
    pub track: TrackReport,
    /// Composite alert flag
    #[serde(rename = "estado_general")]
    pub overall: OverallState,
}

/// One-uplink-at-a-time processing facade.
///
/// Engines are pure and the baseline model is read-only shared state, so one
/// processor instance serves concurrent requests without locking.
pub struct UplinkProcessor {
    thermal: TemperatureEngine,
    activity: ActivityEngine,
    trajectory: TrajectoryEngine,
}

impl UplinkProcessor {
    /// Build a processor backed by a fitted baseline model
    pub fn new(model: Arc<dyn BaselineModel>) -> Self {
        Self {
            thermal: TemperatureEngine::with_model(model),
            activity: ActivityEngine::default(),
            trajectory: TrajectoryEngine::default(),
        }
    }

    /// Build a processor that relies on the linear baseline fallback
    pub fn without_model() -> Self {
        Self {
            thermal: TemperatureEngine::default(),
            activity: ActivityEngine::default(),
            trajectory: TrajectoryEngine::default(),
        }
    }

    /// Process one raw uplink body end to end.
    ///
    /// Total function: every malformed input degrades inside the normalizer
    /// or an engine, and a record always comes back.
    pub fn process(&self, body: &Value) -> ProcessedRecord {
        let up = uplink::normalize(body);
        log::debug!(
            "processing uplink from device {:?} (subject {:?})",
            up.device_key,
            up.subject_id
        );

        let thermal = self.thermal.assess(
            up.body_temp_c,
            up.ambient_temp_c,
            Some(up.humidity_pct),
            up.received_local.hour(),
        );
        let activity = self.activity.classify(&up.accel);
        let track = self.trajectory.analyze(&up.gps);

        let overall = derive_overall(Some(thermal.state), Some(activity.level));

        ProcessedRecord {
            timestamp_local: up.received_local.to_rfc3339(),
            device_key: up.device_key,
            subject_id: up.subject_id,
            event_epoch: up.event_epoch,
            thermal,
            activity,
            track,
            overall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estrus_alert_requires_both_signals() {
        assert_eq!(
            derive_overall(Some(ThermalState::PossibleEstrus), Some(ActivityLevel::High)),
            OverallState::EstrusAlert
        );
    }

    #[test]
    fn other_combinations_pass_thermal_state_through() {
        let cases = [
            (ThermalState::PossibleEstrus, ActivityLevel::Moderate),
            (ThermalState::PossibleEstrus, ActivityLevel::Low),
            (ThermalState::Normal, ActivityLevel::High),
            (ThermalState::Cooling, ActivityLevel::High),
            (ThermalState::NoReading, ActivityLevel::High),
        ];
        for (thermal, activity) in cases {
            assert_eq!(
                derive_overall(Some(thermal), Some(activity)),
                OverallState::Thermal(thermal),
                "thermal {thermal:?} + activity {activity:?}"
            );
        }
    }

    #[test]
    fn missing_thermal_assessment_is_unknown() {
        assert_eq!(
            derive_overall(None, Some(ActivityLevel::High)),
            OverallState::Unknown
        );
        assert_eq!(OverallState::Unknown.as_str(), "desconocido");
    }

    #[test]
    fn overall_state_serializes_to_wire_names() {
        let json = serde_json::to_string(&OverallState::EstrusAlert).unwrap();
        assert_eq!(json, "\"alerta_celo\"");
        let json = serde_json::to_string(&OverallState::Thermal(ThermalState::Normal)).unwrap();
        assert_eq!(json, "\"normal\"");
    }
}
