//! Error types for field-data validation failures
//!
//! Errors here are internal bookkeeping, not a public failure surface: every
//! engine catches them at its own boundary and degrades to a documented
//! "no data" output. A LoRaWAN uplink must never fail end-to-end because one
//! sensor sent a corrupted frame.
//!
//! Variants are kept small and `Copy` since they are produced in the per-field
//! hot path and usually only feed a `warn!` log line.

use thiserror::Error;

/// Result type for range validation
pub type RangeResult = Result<f64, RangeError>;

/// A reading fell outside its physically plausible window
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("value {value} outside range [{min}, {max}]")]
pub struct RangeError {
    /// The reading that failed validation
    pub value: f64,
    /// Lower bound of the plausible window
    pub min: f64,
    /// Upper bound of the plausible window
    pub max: f64,
}
