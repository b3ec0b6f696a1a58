//! Bovine Physiological Limits and Classification Thresholds
//!
//! Plausibility windows for cattle-mounted sensor readings and the thresholds
//! used by the thermal and activity classifiers. Values outside these windows
//! indicate sensor faults, not animal physiology.

// ===== TEMPERATURE PLAUSIBILITY WINDOWS =====

/// Minimum plausible ambient temperature at a pasture site (°C).
///
/// Grazing operations do not run sensors in climates colder than this;
/// lower readings indicate a faulty or disconnected probe.
pub const AMBIENT_TEMP_MIN_C: f64 = -20.0;

/// Maximum plausible ambient temperature at a pasture site (°C).
///
/// Above the hottest reliable surface readings; higher values indicate
/// direct-sun radiant heating of the probe or a fault.
pub const AMBIENT_TEMP_MAX_C: f64 = 60.0;

/// Minimum plausible dorsal (body-surface) temperature for cattle (°C).
///
/// Severe hypothermia territory; a live animal does not read lower, so
/// anything below is treated as a sensor fault.
pub const BODY_TEMP_MIN_C: f64 = 20.0;

/// Maximum plausible dorsal temperature for cattle (°C).
///
/// Above lethal hyperthermia for bovines; higher readings are electrical
/// noise or probe detachment.
pub const BODY_TEMP_MAX_C: f64 = 45.0;

/// Ambient temperature assumed when the payload omits it (°C).
///
/// Mid-range pasture conditions; keeps the baseline predictor and heat
/// index defined for partial frames.
pub const DEFAULT_AMBIENT_C: f64 = 25.0;

/// Relative humidity assumed when the payload omits it (%).
///
/// Typical humid-pasture midpoint; every normalized record carries a
/// humidity value so downstream math never branches on its absence.
pub const DEFAULT_HUMIDITY_PCT: f64 = 65.0;

// ===== THERMAL CLASSIFICATION =====

/// Body-temperature deviation that flags a possible estrus event (°C).
///
/// Sustained dorsal readings this far above the predicted baseline
/// correlate with the pre-ovulatory temperature rise in cows. The same
/// magnitude below baseline flags abnormal cooling.
pub const ESTRUS_DELTA_C: f64 = 1.5;

/// Coefficient of the linear baseline fallback (°C per % RH).
///
/// Used when no regression model is available: expected dorsal temperature
/// rises slightly with humidity since evaporative cooling loses efficiency.
pub const BASELINE_HUMIDITY_COEFF: f64 = 0.02;

/// Coefficient of the simplified ambient heat index (°C per % RH).
pub const HEAT_INDEX_HUMIDITY_COEFF: f64 = 0.1;

/// Hour of day assumed when no receive time is available.
///
/// Midday, the center of the diurnal temperature cycle.
pub const DEFAULT_HOUR_OF_DAY: u32 = 12;

// ===== ACTIVITY CLASSIFICATION =====

/// VeDBA above which activity is classified as high (g).
///
/// Running, mounting, and estrus restlessness push vectorial dynamic body
/// acceleration past this level in collar-mounted accelerometers.
pub const ACTIVITY_HIGH_VEDBA_G: f64 = 1.5;

/// VeDBA above which activity is classified as moderate (g).
///
/// Walking and active grazing; below this the animal is resting or
/// ruminating in place.
pub const ACTIVITY_MODERATE_VEDBA_G: f64 = 0.3;

/// Maximum credible dynamic-body-acceleration magnitude (g).
///
/// Collar accelerometers on cattle never sustain more; larger magnitudes
/// are electrical noise or impact artifacts and are zeroed out.
pub const DBA_MAGNITUDE_CAP_G: f64 = 10.0;
