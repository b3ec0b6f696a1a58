//! Baseline regression forest
//!
//! Averages an ensemble of randomized regression trees, each fitted on its
//! own bootstrap draw of the training set with its own derived seed. The
//! whole fit is deterministic in the configured seed.

use crate::{rng::Rng, tree::{RegressionTree, TreeConfig}, Sample, TrainError};

/// Forest configuration
#[derive(Debug, Clone)]
pub struct ForestConfig {
    /// Number of trees in the ensemble
    pub num_trees: usize,
    /// Bootstrap draw size per tree (capped at the training-set size)
    pub sample_size: usize,
    /// Maximum depth per tree
    pub max_depth: usize,
    /// Minimum leaf size per tree
    pub min_leaf: usize,
    /// Master seed; per-tree seeds derive from it
    pub seed: u32,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            num_trees: 80,
            sample_size: 256,
            max_depth: 8,
            min_leaf: 4,
            seed: 42,
        }
    }
}

/// A fitted ensemble predicting baseline dorsal temperature from
/// `[ambient_c, humidity_pct, hour_of_day]`
#[derive(Debug, Clone)]
pub struct BaselineForest {
    trees: Vec<RegressionTree>,
    config: ForestConfig,
}

impl BaselineForest {
    /// Create an unfitted forest
    pub fn new(config: ForestConfig) -> Self {
        Self {
            trees: Vec::new(),
            config,
        }
    }

    /// Fit the ensemble on a training set
    pub fn fit(&mut self, samples: &[Sample]) -> Result<(), TrainError> {
        if samples.is_empty() {
            return Err(TrainError::InsufficientData);
        }
        self.trees.clear();

        let mut rng = Rng::new(self.config.seed);
        let draw = self.config.sample_size.min(samples.len()).max(1);

        for i in 0..self.config.num_trees {
            let subset: Vec<Sample> = (0..draw)
                .map(|_| samples[rng.index(samples.len())])
                .collect();
            let mut tree = RegressionTree::new(TreeConfig {
                max_depth: self.config.max_depth,
                min_leaf: self.config.min_leaf,
                seed: self.config.seed.wrapping_add(i as u32).wrapping_mul(0x9E37_79B9),
            });
            tree.fit(&subset)?;
            self.trees.push(tree);
        }
        Ok(())
    }

    /// Mean prediction across the ensemble; `None` when unfitted
    pub fn estimate(&self, features: &[f64; 3]) -> Option<f64> {
        if self.trees.is_empty() {
            return None;
        }
        let mut sum = 0.0;
        let mut count = 0usize;
        for tree in &self.trees {
            if let Some(v) = tree.predict(features) {
                sum += v;
                count += 1;
            }
        }
        (count > 0).then(|| sum / count as f64)
    }

    /// Number of fitted trees
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}
