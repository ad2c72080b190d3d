//! Up/down classifier used by the signal pipeline.
//!
//! The model is trained and scored on the same historical window; there is no
//! hold-out split.

use super::forest::{Dataset, ForestConfig, RandomForest};
use super::SignalError;
use crate::config::SignalConfig;
use crate::types::{FeatureRow, LabeledFeatureRow};
use tracing::debug;

/// Binary classifier over feature rows. Implementations must be
/// deterministic: the same rows always train a model with the same
/// predictions.
pub trait SignalClassifier: Send + Sync {
    type Model;

    /// Fit a model for `symbol`. Fails with [`SignalError::InsufficientData`]
    /// when `rows` is empty.
    fn train(&self, symbol: &str, rows: &[LabeledFeatureRow]) -> Result<Self::Model, SignalError>;

    /// One prediction in `{0, 1}` per row, in input order.
    fn predict(&self, model: &Self::Model, rows: &[FeatureRow]) -> Vec<u8>;
}

/// Forest fit to one symbol's features for one request.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    symbol: String,
    samples: usize,
    forest: RandomForest,
}

impl TrainedModel {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of rows the model was trained on.
    pub fn samples(&self) -> usize {
        self.samples
    }
}

/// Random forest classifier with a fixed seed.
#[derive(Debug, Clone, Default)]
pub struct RandomForestClassifier {
    config: ForestConfig,
}

impl RandomForestClassifier {
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &SignalConfig) -> Self {
        Self::new(ForestConfig {
            n_trees: config.n_trees,
            max_depth: config.max_depth,
            bootstrap: config.bootstrap,
            seed: config.seed,
            ..ForestConfig::default()
        })
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}

impl SignalClassifier for RandomForestClassifier {
    type Model = TrainedModel;

    fn train(&self, symbol: &str, rows: &[LabeledFeatureRow]) -> Result<TrainedModel, SignalError> {
        let mut dataset = Dataset::default();
        for labeled in rows {
            dataset.push(labeled.row.values(), labeled.label);
        }

        let forest = RandomForest::fit(&self.config, &dataset).ok_or_else(|| {
            SignalError::InsufficientData {
                symbol: symbol.to_string(),
            }
        })?;

        debug!(
            "Trained {} trees for {} on {} rows",
            forest.n_trees(),
            symbol,
            rows.len()
        );

        Ok(TrainedModel {
            symbol: symbol.to_string(),
            samples: rows.len(),
            forest,
        })
    }

    fn predict(&self, model: &TrainedModel, rows: &[FeatureRow]) -> Vec<u8> {
        rows.iter()
            .map(|row| model.forest.predict(&row.values()))
            .collect()
    }
}
