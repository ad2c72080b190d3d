//! Trading signal pipeline.
//!
//! Builds return/trend/volatility features from daily prices, trains a seeded
//! up/down classifier per symbol and reduces its predictions to one
//! Buy/Hold/Sell signal per quarter.

pub mod aggregator;
pub mod classifier;
pub mod features;
pub mod forest;
pub mod service;

pub use aggregator::SignalAggregator;
pub use classifier::{RandomForestClassifier, SignalClassifier, TrainedModel};
pub use features::{build_features, FeatureBuilder};
pub use forest::{ForestConfig, RandomForest};
pub use service::{SignalMap, SignalService};

use crate::sources::SourceError;
use thiserror::Error;

/// Signal pipeline failures.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Not enough price history to train a model for {symbol}")]
    InsufficientData { symbol: String },

    #[error("No price data found for {symbol}")]
    EmptySeries { symbol: String },

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Signal computation failed: {0}")]
    Worker(String),
}
