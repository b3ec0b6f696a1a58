//! Randomized regression tree
//!
//! One tree of the baseline forest. Splits are extremely randomized: a
//! random feature with a random threshold drawn between that feature's
//! observed bounds in the node's subset. Individual trees are weak; the
//! forest's average is the estimator. Leaves store the mean target of the
//! samples that reached them.

use crate::{rng::Rng, Sample, TrainError};

/// Per-tree configuration
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Maximum split depth
    pub max_depth: usize,
    /// Subsets at or below this size become leaves
    pub min_leaf: usize,
    /// Seed for split randomization
    pub seed: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            min_leaf: 4,
            seed: 42,
        }
    }
}

/// Tree node: an internal split or a mean-valued leaf
#[derive(Debug, Clone, Copy)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A fitted randomized regression tree
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    config: TreeConfig,
}

impl RegressionTree {
    /// Create an unfitted tree
    pub fn new(config: TreeConfig) -> Self {
        Self {
            nodes: Vec::new(),
            config,
        }
    }

    /// Fit the tree on a sample set
    pub fn fit(&mut self, samples: &[Sample]) -> Result<(), TrainError> {
        if samples.is_empty() {
            return Err(TrainError::InsufficientData);
        }
        self.nodes.clear();
        let mut rng = Rng::new(self.config.seed);
        let indices: Vec<usize> = (0..samples.len()).collect();
        self.build(samples, indices, 0, &mut rng);
        Ok(())
    }

    /// Predict the target for one feature vector; `None` when unfitted
    pub fn predict(&self, features: &[f64; 3]) -> Option<f64> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut at = 0;
        loop {
            match self.nodes[at] {
                Node::Leaf { value } => return Some(value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    at = if features[feature] < threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Number of nodes in the fitted tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Recursively grow the tree; returns the new node's index
    fn build(
        &mut self,
        samples: &[Sample],
        indices: Vec<usize>,
        depth: usize,
        rng: &mut Rng,
    ) -> usize {
        if depth >= self.config.max_depth || indices.len() <= self.config.min_leaf {
            return self.push_leaf(samples, &indices);
        }

        let Some((feature, threshold)) = self.random_split(samples, &indices, rng) else {
            // every feature is constant in this subset
            return self.push_leaf(samples, &indices);
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| samples[i].features[feature] < threshold);

        if left.is_empty() || right.is_empty() {
            let indices = if left.is_empty() { right } else { left };
            return self.push_leaf(samples, &indices);
        }

        // Reserve the slot before the children claim theirs
        let at = self.nodes.len();
        self.nodes.push(Node::Leaf { value: 0.0 });
        let left_idx = self.build(samples, left, depth + 1, rng);
        let right_idx = self.build(samples, right, depth + 1, rng);
        self.nodes[at] = Node::Split {
            feature,
            threshold,
            left: left_idx,
            right: right_idx,
        };
        at
    }

    /// Draw a random split: a random non-degenerate feature with a random
    /// threshold inside its observed bounds
    fn random_split(
        &self,
        samples: &[Sample],
        indices: &[usize],
        rng: &mut Rng,
    ) -> Option<(usize, f64)> {
        const FEATURES: usize = 3;
        let mut candidates: Vec<(usize, f64, f64)> = Vec::with_capacity(FEATURES);
        for feature in 0..FEATURES {
            let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
            for &i in indices {
                let v = samples[i].features[feature];
                lo = lo.min(v);
                hi = hi.max(v);
            }
            if hi > lo {
                candidates.push((feature, lo, hi));
            }
        }
        let (feature, lo, hi) = *candidates.get(rng.index(candidates.len()))?;
        Some((feature, rng.range_f64(lo, hi)))
    }

    fn push_leaf(&mut self, samples: &[Sample], indices: &[usize]) -> usize {
        let sum: f64 = indices.iter().map(|&i| samples[i].target).sum();
        let value = sum / indices.len().max(1) as f64;
        self.nodes.push(Node::Leaf { value });
        self.nodes.len() - 1
    }
}
