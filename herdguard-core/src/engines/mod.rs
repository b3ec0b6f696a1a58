//! Derived-Metrics Engines for Livestock Telemetry
//!
//! ## Overview
//!
//! Three independent engines turn one normalized uplink into physiological
//! and behavioral indicators:
//!
//! - [`temperature`] — thermal state from dorsal temperature vs. a predicted
//!   baseline (possible estrus / cooling / normal / no reading)
//! - [`activity`] — behavioral activity level from dynamic-body-acceleration
//!   magnitudes (high / moderate / low)
//! - [`trajectory`] — great-circle distance, mean speed, and path
//!   straightness from one or many GPS fixes
//!
//! ## Shared Contract
//!
//! Every engine follows the same rules:
//!
//! ### 1. Pure Functions
//! An engine is a pure function of one uplink's fields. No engine keeps
//! history, shares state with another engine, or observes a second request.
//!
//! ### 2. Total at the Boundary
//! Engines never fail past their boundary. Missing, corrupted, and
//! physically implausible input degrades to a documented "no data" output
//! while the rest of the record keeps processing. Field-deployed LoRaWAN
//! tags send partial and corrupted frames as a matter of course; one bad
//! sensor must not cost the record.
//!
//! ### 3. Plausibility Before Math
//! Each engine checks its inputs against the physiological and geodetic
//! windows in [`crate::constants`] before deriving anything. Rejected values
//! are logged at `warn` and treated as absent.
//!
//! ### 4. Wire-Contract Output
//! Reports carry the dashboard's exact field names and decimal precision
//! (temperatures and movement at 2 decimals, DBA magnitudes at 3).

pub mod activity;
pub mod temperature;
pub mod trajectory;

pub use activity::{ActivityEngine, ActivityLevel, ActivityReport};
pub use temperature::{BaselineModel, TemperatureEngine, ThermalReport, ThermalState};
pub use trajectory::{haversine_m, TrackReport, TrajectoryEngine};
