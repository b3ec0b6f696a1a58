//! Thermal-state classifier for dorsal temperature readings
//!
//! Classifies each uplink's thermal state from:
//! - Dorsal (body-surface) temperature vs. a predicted baseline
//! - Ambient temperature and relative humidity as baseline inputs
//! - A fixed deviation threshold marking possible estrus or abnormal cooling
//!
//! The baseline predictor is an injected capability so the engine is fully
//! testable without a fitted model; a deterministic linear fallback covers
//! the missing-model and failed-prediction paths.
//!
//! The engine is total: corrupted, missing, or implausible input degrades to
//! the "no reading" state and the caller always receives a report.

use serde::Serialize;

use crate::{
    constants::physiology::{
        AMBIENT_TEMP_MAX_C, AMBIENT_TEMP_MIN_C, BASELINE_HUMIDITY_COEFF, BODY_TEMP_MAX_C,
        BODY_TEMP_MIN_C, DEFAULT_AMBIENT_C, DEFAULT_HUMIDITY_PCT, ESTRUS_DELTA_C,
        HEAT_INDEX_HUMIDITY_COEFF,
    },
    numeric::{check_range, clamp, round2},
};

use std::sync::Arc;

/// Baseline body-temperature predictor injected into the engine.
///
/// Implementations estimate the expected resting dorsal temperature for the
/// given environment. Returning `None` (or a non-finite value) hands control
/// to the engine's deterministic linear fallback — prediction failure is
/// invisible past the engine boundary.
pub trait BaselineModel: Send + Sync {
    /// Expected resting dorsal temperature (°C) for the environment
    fn predict(&self, ambient_c: f64, humidity_pct: f64, hour_of_day: f64) -> Option<f64>;
}

/// Thermal state derived from baseline deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThermalState {
    /// Dorsal temperature well above baseline, consistent with estrus
    #[serde(rename = "posible_celo")]
    PossibleEstrus,
    /// Dorsal temperature well below baseline
    #[serde(rename = "enfriamiento")]
    Cooling,
    /// Deviation within the normal band
    #[serde(rename = "normal")]
    Normal,
    /// No usable dorsal reading in this uplink
    #[serde(rename = "sin_lectura")]
    NoReading,
}

impl ThermalState {
    /// Wire-contract name of the state
    pub const fn as_str(&self) -> &'static str {
        match self {
            ThermalState::PossibleEstrus => "posible_celo",
            ThermalState::Cooling => "enfriamiento",
            ThermalState::Normal => "normal",
            ThermalState::NoReading => "sin_lectura",
        }
    }
}

/// Pure output of the thermal classifier.
///
/// Field names follow the dashboard wire contract. Absent readings serialize
/// as `null` — the dashboard distinguishes "no data" from zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThermalReport {
    /// Dorsal temperature as accepted (°C), null when absent or rejected
    #[serde(rename = "temp_dorsal")]
    pub body_c: Option<f64>,
    /// Ambient temperature as accepted (°C)
    #[serde(rename = "temp_amb")]
    pub ambient_c: Option<f64>,
    /// Relative humidity after clamping/defaulting (%)
    #[serde(rename = "humedad")]
    pub humidity_pct: f64,
    /// Predicted baseline dorsal temperature (°C)
    #[serde(rename = "temp_base")]
    pub baseline_c: Option<f64>,
    /// Deviation from baseline (°C)
    #[serde(rename = "delta_temp")]
    pub delta_c: Option<f64>,
    /// Deviation as a percentage of baseline, null when baseline is 0
    #[serde(rename = "delta_pct")]
    pub delta_pct: Option<f64>,
    /// Simplified ambient heat index, always populated
    #[serde(rename = "indice_termico")]
    pub heat_index: f64,
    /// Classified thermal state
    #[serde(rename = "estado")]
    pub state: ThermalState,
}

/// Thermal-state classifier with physiological plausibility windows
#[derive(Clone)]
pub struct TemperatureEngine {
    /// Plausible ambient window (°C); readings outside are rejected to absent
    ambient_range: (f64, f64),
    /// Plausible dorsal window (°C); readings outside are rejected to absent
    body_range: (f64, f64),
    /// Baseline deviation flagging estrus (positive) or cooling (negative)
    estrus_delta_c: f64,
    /// Injected baseline predictor; linear fallback when absent
    model: Option<Arc<dyn BaselineModel>>,
}

impl Default for TemperatureEngine {
    fn default() -> Self {
        Self {
            ambient_range: (AMBIENT_TEMP_MIN_C, AMBIENT_TEMP_MAX_C),
            body_range: (BODY_TEMP_MIN_C, BODY_TEMP_MAX_C),
            estrus_delta_c: ESTRUS_DELTA_C,
            model: None,
        }
    }
}

impl TemperatureEngine {
    /// Create an engine backed by a fitted baseline model
    pub fn with_model(model: Arc<dyn BaselineModel>) -> Self {
        Self {
            model: Some(model),
            ..Self::default()
        }
    }

    /// Create an engine with custom plausibility windows
    pub fn new_with_limits(ambient: (f64, f64), body: (f64, f64), estrus_delta: f64) -> Self {
        // Sanity check: windows must be ordered
        let order = |(lo, hi): (f64, f64)| if lo > hi { (hi, lo) } else { (lo, hi) };
        Self {
            ambient_range: order(ambient),
            body_range: order(body),
            estrus_delta_c: estrus_delta.abs(),
            model: None,
        }
    }

    /// Classify one uplink's thermal state.
    ///
    /// All inputs are optional and untrusted. An exact-zero body or ambient
    /// reading is a known sensor-dropout signature and is treated as absent,
    /// never as a real temperature.
    pub fn assess(
        &self,
        body_c: Option<f64>,
        ambient_c: Option<f64>,
        humidity_pct: Option<f64>,
        hour_of_day: u32,
    ) -> ThermalReport {
        let body = self.accept_reading(body_c, self.body_range, "dorsal");
        let ambient = self.accept_reading(ambient_c, self.ambient_range, "ambient");
        let humidity = humidity_pct
            .filter(|v| v.is_finite())
            .map(|v| clamp(v, 0.0, 100.0))
            .unwrap_or(DEFAULT_HUMIDITY_PCT);

        let ambient_or_default = ambient.unwrap_or(DEFAULT_AMBIENT_C);
        let heat_index = round2(ambient_or_default + HEAT_INDEX_HUMIDITY_COEFF * humidity);

        let Some(body) = body else {
            return ThermalReport {
                body_c: None,
                ambient_c: ambient.map(round2),
                humidity_pct: round2(humidity),
                baseline_c: None,
                delta_c: None,
                delta_pct: None,
                heat_index,
                state: ThermalState::NoReading,
            };
        };

        let baseline = self.baseline(ambient_or_default, humidity, hour_of_day);
        let delta = body - baseline;
        let delta_pct = if baseline != 0.0 {
            Some(round2(100.0 * delta / baseline))
        } else {
            None
        };

        let state = if delta >= self.estrus_delta_c {
            ThermalState::PossibleEstrus
        } else if delta <= -self.estrus_delta_c {
            ThermalState::Cooling
        } else {
            ThermalState::Normal
        };

        ThermalReport {
            body_c: Some(round2(body)),
            ambient_c: ambient.map(round2),
            humidity_pct: round2(humidity),
            baseline_c: Some(round2(baseline)),
            delta_c: Some(round2(delta)),
            delta_pct,
            heat_index,
            state,
        }
    }

    /// Coerce one temperature reading through the dropout and range filters
    fn accept_reading(&self, value: Option<f64>, range: (f64, f64), label: &str) -> Option<f64> {
        let value = value.filter(|v| v.is_finite())?;
        // Exact zero is the dropout signature of these probes, not a reading
        if value == 0.0 {
            return None;
        }
        match check_range(value, range.0, range.1) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("rejected {label} temperature: {e}");
                None
            }
        }
    }

    /// Baseline prediction with deterministic linear fallback
    fn baseline(&self, ambient_c: f64, humidity_pct: f64, hour_of_day: u32) -> f64 {
        self.model
            .as_ref()
            .and_then(|m| m.predict(ambient_c, humidity_pct, hour_of_day as f64))
            .filter(|v| v.is_finite())
            .unwrap_or_else(|| ambient_c + BASELINE_HUMIDITY_COEFF * humidity_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::physiology::DEFAULT_HOUR_OF_DAY;

    /// Fixed-output model for threshold tests
    struct FixedBaseline(f64);

    impl BaselineModel for FixedBaseline {
        fn predict(&self, _: f64, _: f64, _: f64) -> Option<f64> {
            Some(self.0)
        }
    }

    /// Model that always fails, forcing the linear fallback
    struct BrokenModel;

    impl BaselineModel for BrokenModel {
        fn predict(&self, _: f64, _: f64, _: f64) -> Option<f64> {
            None
        }
    }

    fn engine_with_baseline(baseline: f64) -> TemperatureEngine {
        TemperatureEngine::with_model(Arc::new(FixedBaseline(baseline)))
    }

    #[test]
    fn delta_is_body_minus_baseline() {
        let engine = engine_with_baseline(37.0);
        let report = engine.assess(Some(39.5), Some(28.0), Some(65.0), DEFAULT_HOUR_OF_DAY);
        assert_eq!(report.body_c, Some(39.5));
        assert_eq!(report.baseline_c, Some(37.0));
        assert_eq!(report.delta_c, Some(2.5));
        assert_eq!(report.state, ThermalState::PossibleEstrus);
    }

    #[test]
    fn classification_thresholds_are_inclusive() {
        let engine = engine_with_baseline(37.0);
        // delta = 1.5 exactly flags estrus
        let at = engine.assess(Some(38.5), Some(25.0), None, DEFAULT_HOUR_OF_DAY);
        assert_eq!(at.state, ThermalState::PossibleEstrus);
        // just under stays normal
        let under = engine.assess(Some(38.49999), Some(25.0), None, DEFAULT_HOUR_OF_DAY);
        assert_eq!(under.state, ThermalState::Normal);
        // mirrored on the cooling side
        let cooling = engine.assess(Some(35.5), Some(25.0), None, DEFAULT_HOUR_OF_DAY);
        assert_eq!(cooling.state, ThermalState::Cooling);
    }

    #[test]
    fn exact_zero_reading_is_dropout() {
        let engine = engine_with_baseline(37.0);
        let report = engine.assess(Some(0.0), Some(0.0), Some(50.0), DEFAULT_HOUR_OF_DAY);
        assert_eq!(report.body_c, None);
        assert_eq!(report.ambient_c, None);
        assert_eq!(report.state, ThermalState::NoReading);
        // heat index falls back to the default ambient
        assert_eq!(report.heat_index, 30.0);
    }

    #[test]
    fn out_of_range_readings_reject_to_absent() {
        let engine = engine_with_baseline(37.0);
        let report = engine.assess(Some(55.0), Some(80.0), Some(50.0), DEFAULT_HOUR_OF_DAY);
        assert_eq!(report.body_c, None);
        assert_eq!(report.ambient_c, None);
        assert_eq!(report.state, ThermalState::NoReading);
    }

    #[test]
    fn humidity_clamps_and_defaults() {
        let engine = engine_with_baseline(37.0);
        let clamped = engine.assess(Some(38.0), Some(25.0), Some(140.0), DEFAULT_HOUR_OF_DAY);
        assert_eq!(clamped.humidity_pct, 100.0);
        let defaulted = engine.assess(Some(38.0), Some(25.0), None, DEFAULT_HOUR_OF_DAY);
        assert_eq!(defaulted.humidity_pct, 65.0);
    }

    #[test]
    fn missing_body_still_reports_heat_index() {
        let engine = engine_with_baseline(37.0);
        let report = engine.assess(None, Some(30.0), Some(40.0), DEFAULT_HOUR_OF_DAY);
        assert_eq!(report.state, ThermalState::NoReading);
        assert_eq!(report.delta_c, None);
        assert_eq!(report.delta_pct, None);
        assert_eq!(report.heat_index, 34.0);
    }

    #[test]
    fn failed_model_uses_linear_fallback() {
        let engine = TemperatureEngine::with_model(Arc::new(BrokenModel));
        let report = engine.assess(Some(38.0), Some(25.0), Some(50.0), DEFAULT_HOUR_OF_DAY);
        // fallback baseline = 25 + 0.02 * 50 = 26
        assert_eq!(report.baseline_c, Some(26.0));
        assert_eq!(report.delta_c, Some(12.0));
    }

    #[test]
    fn no_model_matches_fallback_formula() {
        let engine = TemperatureEngine::default();
        let report = engine.assess(Some(30.0), None, Some(65.0), DEFAULT_HOUR_OF_DAY);
        // ambient defaults to 25, baseline = 25 + 0.02 * 65 = 26.3
        assert_eq!(report.baseline_c, Some(26.3));
        assert_eq!(report.heat_index, 31.5);
    }

    #[test]
    fn delta_pct_relative_to_baseline() {
        let engine = engine_with_baseline(40.0);
        let report = engine.assess(Some(42.0), Some(25.0), Some(50.0), DEFAULT_HOUR_OF_DAY);
        assert_eq!(report.delta_pct, Some(5.0));
    }
}
