//! Baseline Body-Temperature Regression for HerdGuard
//!
//! ## Overview
//!
//! The thermal classifier compares each dorsal reading against an *expected*
//! resting temperature for the current environment. This crate supplies that
//! expectation: a randomized regression forest over
//! `[ambient_c, humidity_pct, hour_of_day]`, fitted once at process start
//! and shared read-only for the process lifetime.
//!
//! ## Why a Randomized Forest?
//!
//! 1. **Deterministic**: seeded xorshift randomization — every deployment
//!    fits bit-identical trees, so baselines are stable fleet-wide
//! 2. **Dependency-free**: no model file to ship, no numeric runtime
//! 3. **Bounded**: predictions are averages of observed targets, so the
//!    baseline can never leave the plausible dorsal band
//! 4. **Cheap**: prediction is `num_trees` tree walks, O(depth) each
//!
//! ## Failure Model
//!
//! An unfitted forest predicts `None`, and the temperature engine's linear
//! fallback takes over — prediction failure is invisible to callers of the
//! pipeline.
//!
//! ```
//! use herdguard_ml::BaselineForest;
//! use herdguard_core::BaselineModel;
//!
//! let forest = BaselineForest::fitted();
//! let baseline = forest.predict(25.0, 50.0, 12.0);
//! assert!(baseline.is_some());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod rng;

pub mod forest;
pub mod training;
pub mod tree;

pub use forest::{BaselineForest, ForestConfig};
pub use training::{synthetic_herd_samples, DEFAULT_TRAINING_SAMPLES};
pub use tree::{RegressionTree, TreeConfig};

use thiserror::Error;

/// One training observation: `[ambient_c, humidity_pct, hour_of_day]` →
/// resting dorsal temperature (°C)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Feature vector
    pub features: [f64; 3],
    /// Observed dorsal temperature (°C)
    pub target: f64,
}

/// Training failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainError {
    /// The training set was empty
    #[error("insufficient training data")]
    InsufficientData,
}

impl BaselineForest {
    /// Fit the default forest on the synthetic herd dataset.
    ///
    /// Deterministic: the default config's seed drives both the data draw
    /// and every tree. Intended to run once at process start.
    pub fn fitted() -> Self {
        let config = ForestConfig::default();
        let samples = synthetic_herd_samples(DEFAULT_TRAINING_SAMPLES, config.seed);
        let mut forest = Self::new(config);
        if let Err(e) = forest.fit(&samples) {
            // Unreachable with a non-empty synthetic draw; the unfitted
            // forest still predicts None and the engine fallback covers it
            log::warn!("baseline forest fit failed: {e}");
        }
        forest
    }
}

impl herdguard_core::BaselineModel for BaselineForest {
    fn predict(&self, ambient_c: f64, humidity_pct: f64, hour_of_day: f64) -> Option<f64> {
        self.estimate(&[ambient_c, humidity_pct, hour_of_day])
    }
}
