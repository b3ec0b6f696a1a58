//! Activity classifier for dynamic-body-acceleration magnitudes
//!
//! Classifies behavioral activity from VeDBA (vectorial dynamic body
//! acceleration), with ODBA carried alongside for the dashboard. Collar
//! accelerometers deliver noisy frames — absent, non-numeric, and
//! physically implausible magnitudes all degrade to 0.0 rather than failing
//! the uplink.

use serde::Serialize;

use crate::{
    constants::physiology::{
        ACTIVITY_HIGH_VEDBA_G, ACTIVITY_MODERATE_VEDBA_G, DBA_MAGNITUDE_CAP_G,
    },
    numeric::round3,
    uplink::AccelSummary,
};

/// Activity level derived from VeDBA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityLevel {
    /// Running, mounting, estrus restlessness
    #[serde(rename = "alta")]
    High,
    /// Walking, active grazing
    #[serde(rename = "media")]
    Moderate,
    /// Resting or ruminating in place
    #[serde(rename = "baja")]
    Low,
}

impl ActivityLevel {
    /// Wire-contract name of the level
    pub const fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::High => "alta",
            ActivityLevel::Moderate => "media",
            ActivityLevel::Low => "baja",
        }
    }
}

/// Pure output of the activity classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityReport {
    /// Overall dynamic body acceleration (g), sanitized
    #[serde(rename = "ODBA")]
    pub odba: f64,
    /// Vectorial dynamic body acceleration (g), sanitized
    #[serde(rename = "VeDBA")]
    pub vedba: f64,
    /// Classified activity level
    #[serde(rename = "actividad")]
    pub level: ActivityLevel,
}

/// Activity classifier with a physical magnitude cap
#[derive(Debug, Clone)]
pub struct ActivityEngine {
    /// Magnitudes above this (absolute) are noise and reset to 0.0
    magnitude_cap_g: f64,
    /// VeDBA above this is high activity
    high_vedba_g: f64,
    /// VeDBA above this is moderate activity
    moderate_vedba_g: f64,
}

impl Default for ActivityEngine {
    fn default() -> Self {
        Self {
            magnitude_cap_g: DBA_MAGNITUDE_CAP_G,
            high_vedba_g: ACTIVITY_HIGH_VEDBA_G,
            moderate_vedba_g: ACTIVITY_MODERATE_VEDBA_G,
        }
    }
}

impl ActivityEngine {
    /// Create a classifier with custom thresholds
    pub fn new_with_thresholds(high: f64, moderate: f64, cap: f64) -> Self {
        // Sanity check: thresholds must be ordered
        let (moderate, high) = if moderate > high {
            (high, moderate)
        } else {
            (moderate, high)
        };
        Self {
            magnitude_cap_g: cap.abs(),
            high_vedba_g: high,
            moderate_vedba_g: moderate,
        }
    }

    /// Classify one uplink's activity.
    ///
    /// `max_speed_ms`/`mean_speed_ms` ride along in the summary but play no
    /// role in classification.
    pub fn classify(&self, accel: &AccelSummary) -> ActivityReport {
        let odba = self.sanitize(accel.odba, "ODBA");
        let vedba = self.sanitize(accel.vedba, "VeDBA");

        // Classification uses the unrounded magnitude; thresholds are strict
        let level = if vedba > self.high_vedba_g {
            ActivityLevel::High
        } else if vedba > self.moderate_vedba_g {
            ActivityLevel::Moderate
        } else {
            ActivityLevel::Low
        };

        ActivityReport {
            odba: round3(odba),
            vedba: round3(vedba),
            level,
        }
    }

    /// Reduce one magnitude to a usable value, zeroing noise
    fn sanitize(&self, value: Option<f64>, label: &str) -> f64 {
        match value.filter(|v| v.is_finite()) {
            Some(v) if v.abs() <= self.magnitude_cap_g => v,
            Some(v) => {
                log::warn!("implausible {label} magnitude {v} g, resetting to 0");
                0.0
            }
            None => 0.0,
        }
    }
}
