//! Seeded random forest of CART classification trees.
//!
//! Trees split on Gini impurity over a random subset of features and are fit
//! on bootstrap samples. Tree `i` draws from an RNG seeded with `seed + i`, so
//! the same data and seed always yield the same forest.

use crate::types::FEATURE_COUNT;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Random forest configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestConfig {
    /// Number of trees in the forest.
    pub n_trees: usize,
    /// Maximum depth of each tree (None = grow until pure).
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node.
    pub min_samples_split: usize,
    /// Minimum samples in each leaf.
    pub min_samples_leaf: usize,
    /// Features considered per split (None = floor(sqrt(n_features))).
    pub max_features: Option<usize>,
    /// Fit each tree on a bootstrap sample.
    pub bootstrap: bool,
    /// Base random seed.
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestConfig {
    fn features_per_split(&self) -> usize {
        self.max_features
            .unwrap_or_else(|| (FEATURE_COUNT as f64).sqrt().floor() as usize)
            .clamp(1, FEATURE_COUNT)
    }
}

/// Training samples with binary labels.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub features: Vec<[f64; FEATURE_COUNT]>,
    pub labels: Vec<u8>,
}

impl Dataset {
    pub fn push(&mut self, features: [f64; FEATURE_COUNT], label: u8) {
        self.features.push(features);
        self.labels.push(label);
    }

    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        /// Fraction of class-1 samples that reached this leaf.
        probability: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Gini impurity of a node with `positives` class-1 samples out of `n`.
fn gini(positives: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = positives as f64 / n as f64;
    2.0 * p * (1.0 - p)
}

/// Single CART classification tree.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: TreeNode,
}

impl DecisionTree {
    /// Fit on the samples at `indices` (duplicates allowed).
    fn fit(config: &ForestConfig, data: &Dataset, indices: &[usize], rng: &mut StdRng) -> Self {
        Self {
            root: Self::build(config, data, indices, 0, rng),
        }
    }

    fn build(
        config: &ForestConfig,
        data: &Dataset,
        indices: &[usize],
        depth: usize,
        rng: &mut StdRng,
    ) -> TreeNode {
        let n = indices.len();
        let positives = indices.iter().filter(|&&i| data.labels[i] == 1).count();
        let leaf = TreeNode::Leaf {
            probability: if n == 0 { 0.0 } else { positives as f64 / n as f64 },
        };

        let depth_reached = config.max_depth.is_some_and(|max| depth >= max);
        if positives == 0 || positives == n || n < config.min_samples_split || depth_reached {
            return leaf;
        }

        let Some(split) = Self::best_split(config, data, indices, positives, rng) else {
            return leaf;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| data.features[i][split.feature] <= split.threshold);

        TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(Self::build(config, data, &left, depth + 1, rng)),
            right: Box::new(Self::build(config, data, &right, depth + 1, rng)),
        }
    }

    /// Best threshold over a random subset of non-constant features, scanning
    /// sorted values and keeping running class counts.
    fn best_split(
        config: &ForestConfig,
        data: &Dataset,
        indices: &[usize],
        positives: usize,
        rng: &mut StdRng,
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let parent = gini(positives, n);
        let min_leaf = config.min_samples_leaf.max(1);

        let mut features: Vec<usize> = (0..FEATURE_COUNT).collect();
        features.shuffle(rng);

        let mut best: Option<SplitCandidate> = None;
        let mut examined = 0;

        for feature in features {
            if examined == config.features_per_split() {
                break;
            }

            let mut sorted: Vec<(f64, u8)> = indices
                .iter()
                .map(|&i| (data.features[i][feature], data.labels[i]))
                .collect();
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

            // Constant features do not count towards the per-split budget
            if sorted[0].0 >= sorted[n - 1].0 {
                continue;
            }
            examined += 1;

            let mut left_positives = 0;
            for k in 1..n {
                left_positives += usize::from(sorted[k - 1].1 == 1);

                let (lower, upper) = (sorted[k - 1].0, sorted[k].0);
                if lower >= upper || k < min_leaf || n - k < min_leaf {
                    continue;
                }

                let n_left = k as f64;
                let n_right = (n - k) as f64;
                let weighted = (n_left * gini(left_positives, k)
                    + n_right * gini(positives - left_positives, n - k))
                    / n as f64;
                let gain = parent - weighted;

                if gain > best.as_ref().map_or(0.0, |b| b.gain) {
                    let mut threshold = lower + (upper - lower) / 2.0;
                    if threshold >= upper {
                        threshold = lower;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }

        best
    }

    /// Probability of class 1 for one sample.
    pub fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { probability } => return *probability,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        &**left
                    } else {
                        &**right
                    };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn depth_of(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 1,
                TreeNode::Split { left, right, .. } => 1 + depth_of(left).max(depth_of(right)),
            }
        }
        depth_of(&self.root)
    }
}

/// Ensemble of bootstrap-trained decision trees.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Train the forest. Returns `None` for an empty dataset.
    pub fn fit(config: &ForestConfig, data: &Dataset) -> Option<Self> {
        if data.is_empty() {
            return None;
        }

        let n = data.n_samples();
        let trees = (0..config.n_trees.max(1))
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(i as u64));
                let indices: Vec<usize> = if config.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                DecisionTree::fit(config, data, &indices, &mut rng)
            })
            .collect();

        Some(Self { trees })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean class-1 probability across trees.
    pub fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict_proba(features)).sum();
        total / self.trees.len() as f64
    }

    /// Predicted class: 1 when the mean probability exceeds one half.
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> u8 {
        u8::from(self.predict_proba(features) > 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Class 1 exactly when the first feature is positive.
    fn separable(n: usize) -> Dataset {
        let mut data = Dataset::default();
        for i in 0..n {
            let x = i as f64 - (n / 2) as f64;
            data.push([x, 100.0, 0.5], u8::from(x > 0.0));
        }
        data
    }

    fn config(n_trees: usize) -> ForestConfig {
        ForestConfig {
            n_trees,
            ..ForestConfig::default()
        }
    }

    // =========================================================================
    // Gini Tests
    // =========================================================================

    #[test]
    fn test_gini() {
        assert_eq!(gini(0, 10), 0.0);
        assert_eq!(gini(10, 10), 0.0);
        assert_eq!(gini(5, 10), 0.5);
        assert_eq!(gini(0, 0), 0.0);
    }

    #[test]
    fn test_features_per_split_default() {
        assert_eq!(ForestConfig::default().features_per_split(), 1);
        let all = ForestConfig {
            max_features: Some(10),
            ..ForestConfig::default()
        };
        assert_eq!(all.features_per_split(), FEATURE_COUNT);
    }

    // =========================================================================
    // DecisionTree Tests
    // =========================================================================

    #[test]
    fn test_tree_pure_node_is_leaf() {
        let mut data = Dataset::default();
        for i in 0..5 {
            data.push([i as f64, 0.0, 0.0], 1);
        }
        let indices: Vec<usize> = (0..5).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let tree = DecisionTree::fit(&ForestConfig::default(), &data, &indices, &mut rng);

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict_proba(&[100.0, 0.0, 0.0]), 1.0);
    }

    #[test]
    fn test_tree_learns_separable_split() {
        let data = separable(40);
        let indices: Vec<usize> = (0..40).collect();
        let config = ForestConfig {
            max_features: Some(FEATURE_COUNT),
            ..ForestConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let tree = DecisionTree::fit(&config, &data, &indices, &mut rng);

        assert_eq!(tree.predict_proba(&[5.0, 0.0, 0.5]), 1.0);
        assert_eq!(tree.predict_proba(&[-5.0, 0.0, 0.5]), 0.0);
    }

    #[test]
    fn test_tree_respects_max_depth() {
        let data = separable(40);
        let indices: Vec<usize> = (0..40).collect();
        let config = ForestConfig {
            max_depth: Some(0),
            ..ForestConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let tree = DecisionTree::fit(&config, &data, &indices, &mut rng);

        assert_eq!(tree.depth(), 1);
        assert!((tree.predict_proba(&[5.0, 0.0, 0.5]) - 19.0 / 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_tree_identical_features_mixed_labels() {
        let mut data = Dataset::default();
        data.push([1.0, 1.0, 1.0], 1);
        data.push([1.0, 1.0, 1.0], 0);
        let mut rng = StdRng::seed_from_u64(3);
        let tree = DecisionTree::fit(&ForestConfig::default(), &data, &[0, 1], &mut rng);

        assert_eq!(tree.predict_proba(&[1.0, 1.0, 1.0]), 0.5);
    }

    // =========================================================================
    // RandomForest Tests
    // =========================================================================

    #[test]
    fn test_forest_empty_dataset() {
        assert!(RandomForest::fit(&config(10), &Dataset::default()).is_none());
    }

    #[test]
    fn test_forest_tree_count() {
        let forest = RandomForest::fit(&config(25), &separable(30)).unwrap();
        assert_eq!(forest.n_trees(), 25);
    }

    #[test]
    fn test_forest_deterministic() {
        let data = separable(60);
        let a = RandomForest::fit(&config(20), &data).unwrap();
        let b = RandomForest::fit(&config(20), &data).unwrap();

        for features in &data.features {
            assert_eq!(a.predict_proba(features), b.predict_proba(features));
        }
    }

    #[test]
    fn test_forest_single_class() {
        let mut data = Dataset::default();
        for i in 0..10 {
            data.push([0.01 * (i + 1) as f64, 50.0, 0.1], 1);
        }
        let forest = RandomForest::fit(&config(10), &data).unwrap();

        assert_eq!(forest.predict(&[-1.0, 0.0, 0.0]), 1);
        assert_eq!(forest.predict_proba(&[0.5, 50.0, 0.1]), 1.0);
    }

    #[test]
    fn test_forest_fits_training_data() {
        let data = separable(80);
        let forest = RandomForest::fit(&config(30), &data).unwrap();

        let correct = data
            .features
            .iter()
            .zip(&data.labels)
            .filter(|(f, &label)| forest.predict(f) == label)
            .count();
        assert!(correct as f64 / data.n_samples() as f64 > 0.9);
    }
}
