//! Numeric Coercion and Hardening Utilities
//!
//! ## Overview
//!
//! Every numeric field that enters the system passes through this module.
//! Field-deployed LoRaWAN tags routinely deliver partial, zeroed, or corrupted
//! frames, and network servers occasionally re-encode numbers as strings, so
//! nothing downstream may assume a payload value is a usable number.
//!
//! ## Design Principles
//!
//! ### 1. Pure Functions
//! All utilities are pure and allocation-free, safe to call per-field in the
//! request hot path.
//!
//! ### 2. Absent Over Invalid
//! Coercion never errors. Anything that is not a finite number becomes
//! `None`, and each engine decides what "no value" means for its output.
//!
//! ### 3. Wire-Contract Rounding
//! The dashboard contract fixes decimal precision per field group
//! (temperatures at 2 decimals, acceleration magnitudes at 3), so rounding
//! lives here rather than being re-derived at each call site.

use serde_json::Value;

use crate::errors::{RangeError, RangeResult};

/// Coerce an arbitrary JSON value to a finite float.
///
/// Accepts JSON numbers and numeric strings (trimmed). NaN, infinities,
/// non-numeric strings, and every other JSON type yield `None`.
pub fn to_finite(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Constrain a value to `[min, max]`. Never fails.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Check a value against a plausibility window
pub fn check_range(value: f64, min: f64, max: f64) -> RangeResult {
    if value < min || value > max {
        Err(RangeError { value, min, max })
    } else {
        Ok(value)
    }
}

/// Round to 2 decimal places (temperature and movement fields)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 3 decimal places (acceleration magnitudes)
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_numbers_and_numeric_strings() {
        assert_eq!(to_finite(&json!(38.5)), Some(38.5));
        assert_eq!(to_finite(&json!(-3)), Some(-3.0));
        assert_eq!(to_finite(&json!("41.2")), Some(41.2));
        assert_eq!(to_finite(&json!("  7 ")), Some(7.0));
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert_eq!(to_finite(&json!(null)), None);
        assert_eq!(to_finite(&json!("n/a")), None);
        assert_eq!(to_finite(&json!(true)), None);
        assert_eq!(to_finite(&json!([1.0])), None);
        assert_eq!(to_finite(&json!({"v": 1.0})), None);
        // JSON cannot encode NaN/inf as numbers, but strings can smuggle them
        assert_eq!(to_finite(&json!("NaN")), None);
        assert_eq!(to_finite(&json!("inf")), None);
    }

    #[test]
    fn clamp_constrains_both_ends() {
        assert_eq!(clamp(150.0, 0.0, 100.0), 100.0);
        assert_eq!(clamp(-5.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp(65.0, 0.0, 100.0), 65.0);
    }

    #[test]
    fn range_check() {
        assert!(check_range(38.0, 20.0, 45.0).is_ok());
        assert!(check_range(19.9, 20.0, 45.0).is_err());
        assert!(check_range(45.1, 20.0, 45.0).is_err());
        // bounds are inclusive
        assert_eq!(check_range(20.0, 20.0, 45.0), Ok(20.0));
        assert_eq!(check_range(45.0, 20.0, 45.0), Ok(45.0));
    }

    #[test]
    fn rounding_precision() {
        assert_eq!(round2(38.456), 38.46);
        assert_eq!(round2(-2.514), -2.51);
        assert_eq!(round3(0.31449), 0.314);
        assert_eq!(round3(0.12367), 0.124);
    }
}
