//! Geodesy Constants and GPS Plausibility Windows
//!
//! Values used by the trajectory engine for great-circle math and for
//! rejecting GPS fixes that cannot describe a grazing animal.

/// Mean Earth radius used for great-circle (haversine) distance (m).
///
/// Source: IUGG mean radius, the conventional value for haversine math.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Maximum valid latitude magnitude (degrees).
pub const LATITUDE_MAX_DEG: f64 = 90.0;

/// Maximum valid longitude magnitude (degrees).
pub const LONGITUDE_MAX_DEG: f64 = 180.0;

/// Coordinate magnitude below which a fix is the no-lock sentinel (degrees).
///
/// GPS modules report (0, 0) when they have no satellite lock. A point with
/// both coordinates inside this window sits in the Gulf of Guinea, not a
/// pasture, and is discarded.
pub const NO_FIX_EPSILON_DEG: f64 = 1e-9;

/// Maximum credible mean speed for cattle movement (m/s).
///
/// ~72 km/h, well above a galloping cow. Mean speeds past this indicate
/// corrupted fixes or timestamps and reset to 0.
pub const MAX_PLAUSIBLE_SPEED_M_PER_S: f64 = 20.0;
