//! Synthetic training data for the startup fit
//!
//! No labeled herd dataset ships with the system, so the forest fits at
//! process start on synthetic samples drawn from a physiologically grounded
//! generating function: resting dorsal temperature rises mildly with ambient
//! temperature, humidity, and hour of day, plus sensor-grade noise. The draw
//! is fully deterministic in the seed, so every deployment fits the same
//! forest.

use crate::{rng::Rng, Sample};

/// Base resting dorsal temperature (°C)
const BASE_DORSAL_C: f64 = 34.0;
/// Dorsal response to ambient temperature (°C per °C)
const AMBIENT_COEFF: f64 = 0.1;
/// Dorsal response to relative humidity (°C per %)
const HUMIDITY_COEFF: f64 = 0.02;
/// Dorsal response to hour of day (°C per hour)
const HOUR_COEFF: f64 = 0.05;

/// Training-domain ambient window (°C)
const AMBIENT_RANGE: (f64, f64) = (20.0, 30.0);
/// Training-domain humidity window (%)
const HUMIDITY_RANGE: (f64, f64) = (30.0, 70.0);
/// Hours of the day
const HOUR_RANGE: (f64, f64) = (0.0, 24.0);

/// Number of samples fitted at process start
pub const DEFAULT_TRAINING_SAMPLES: usize = 300;

/// Draw `n` deterministic synthetic samples
pub fn synthetic_herd_samples(n: usize, seed: u32) -> Vec<Sample> {
    let mut rng = Rng::new(seed);
    (0..n)
        .map(|_| {
            let ambient = rng.range_f64(AMBIENT_RANGE.0, AMBIENT_RANGE.1);
            let humidity = rng.range_f64(HUMIDITY_RANGE.0, HUMIDITY_RANGE.1);
            let hour = rng.range_f64(HOUR_RANGE.0, HOUR_RANGE.1);
            let target = BASE_DORSAL_C
                + AMBIENT_COEFF * ambient
                + HUMIDITY_COEFF * humidity
                + HOUR_COEFF * hour
                + standard_normal(&mut rng);
            Sample {
                features: [ambient, humidity, hour],
                target,
            }
        })
        .collect()
}

/// Approximate standard normal draw (Irwin–Hall: sum of 12 uniforms − 6)
fn standard_normal(rng: &mut Rng) -> f64 {
    (0..12).map(|_| rng.next_f64()).sum::<f64>() - 6.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_in_the_training_domain() {
        for sample in synthetic_herd_samples(300, 42) {
            let [ambient, humidity, hour] = sample.features;
            assert!((20.0..30.0).contains(&ambient));
            assert!((30.0..70.0).contains(&humidity));
            assert!((0.0..24.0).contains(&hour));
            // generating function range plus the bounded noise term
            assert!((28.0..48.0).contains(&sample.target), "target {}", sample.target);
        }
    }

    #[test]
    fn draw_is_deterministic_in_the_seed() {
        let a = synthetic_herd_samples(50, 42);
        let b = synthetic_herd_samples(50, 42);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.features, y.features);
            assert_eq!(x.target, y.target);
        }
    }

    #[test]
    fn noise_is_roughly_centered() {
        let mut rng = Rng::new(42);
        let n = 2000;
        let mean: f64 = (0..n).map(|_| standard_normal(&mut rng)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.1, "mean {mean}");
    }
}
