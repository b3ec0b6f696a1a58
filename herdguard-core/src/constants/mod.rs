//! Constants for HerdGuard Core
//!
//! Centralized, documented constants used throughout the derivation engines.
//! All plausibility windows and classification thresholds live here with the
//! rationale for each value.
//!
//! ## Organization
//!
//! - **Physiology**: bovine temperature/activity limits and thresholds
//! - **Geo**: geodesy constants and GPS validation windows
//!
//! Use these constants instead of magic numbers; when adding one, document
//! its unit, purpose, and source.

/// Bovine physiological limits, classification thresholds, and defaults.
pub mod physiology;

/// Geodesy constants and GPS plausibility windows.
pub mod geo;

// Re-export commonly used constants for convenience
pub use physiology::{
    AMBIENT_TEMP_MIN_C, AMBIENT_TEMP_MAX_C, BODY_TEMP_MIN_C, BODY_TEMP_MAX_C,
    DEFAULT_AMBIENT_C, DEFAULT_HUMIDITY_PCT, ESTRUS_DELTA_C,
    ACTIVITY_HIGH_VEDBA_G, ACTIVITY_MODERATE_VEDBA_G, DBA_MAGNITUDE_CAP_G,
};

pub use geo::{
    EARTH_RADIUS_M, LATITUDE_MAX_DEG, LONGITUDE_MAX_DEG, NO_FIX_EPSILON_DEG,
    MAX_PLAUSIBLE_SPEED_M_PER_S,
};
