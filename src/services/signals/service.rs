//! Per-request signal generation: fetch, build features, train, aggregate.

use super::aggregator::SignalAggregator;
use super::classifier::{RandomForestClassifier, SignalClassifier};
use super::features::FeatureBuilder;
use super::SignalError;
use crate::config::SignalConfig;
use crate::sources::MarketDataSource;
use crate::types::{LabeledFeatureRow, PriceSeries, Signal, SignalRequest};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Signals per symbol, keyed in sorted order.
pub type SignalMap = BTreeMap<String, Vec<Signal>>;

/// CPU-bound stages that run after the fetch.
struct Pipeline<C> {
    builder: FeatureBuilder,
    classifier: C,
    aggregator: SignalAggregator,
}

impl<C: SignalClassifier> Pipeline<C> {
    fn run(
        &self,
        symbol: &str,
        series: &PriceSeries,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Signal>, SignalError> {
        let features = self.builder.build(series);
        let labeled: Vec<LabeledFeatureRow> = features.iter().map(|r| r.labeled()).collect();
        let model = self.classifier.train(symbol, &labeled)?;

        let signals = self
            .aggregator
            .aggregate(&self.classifier, &model, &features, start, end);

        debug!(
            "{}: {} bars, {} feature rows, {} signals",
            symbol,
            series.len(),
            features.len(),
            signals.len()
        );

        Ok(signals)
    }
}

/// Signal pipeline for one request. Holds no state between requests.
pub struct SignalService<C = RandomForestClassifier> {
    source: Arc<dyn MarketDataSource>,
    pipeline: Arc<Pipeline<C>>,
}

impl SignalService<RandomForestClassifier> {
    pub fn new(source: Arc<dyn MarketDataSource>, config: &SignalConfig) -> Self {
        Self::with_classifier(source, config, RandomForestClassifier::from_config(config))
    }
}

impl<C: SignalClassifier + 'static> SignalService<C> {
    pub fn with_classifier(
        source: Arc<dyn MarketDataSource>,
        config: &SignalConfig,
        classifier: C,
    ) -> Self {
        Self {
            source,
            pipeline: Arc::new(Pipeline {
                builder: FeatureBuilder::new(config.rolling_window),
                classifier,
                aggregator: SignalAggregator::new(config.window_days),
            }),
        }
    }

    /// Generate signals for every requested symbol in turn. The first failing
    /// symbol aborts the request.
    pub async fn generate(&self, request: &SignalRequest) -> Result<SignalMap, SignalError> {
        info!(
            "Generating signals for {} symbols from {} to {} via {}",
            request.symbols.len(),
            request.start,
            request.end,
            self.source.name()
        );

        let mut signals = SignalMap::new();
        for symbol in &request.symbols {
            let symbol_signals = self
                .signals_for_symbol(symbol, request.start, request.end)
                .await?;
            signals.insert(symbol.clone(), symbol_signals);
        }

        Ok(signals)
    }

    /// Run the pipeline for one symbol over `[start, end)`. Everything after
    /// the fetch runs on the blocking pool.
    pub async fn signals_for_symbol(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Signal>, SignalError> {
        let series = self.source.fetch(symbol, start, end).await?;
        if series.is_empty() {
            return Err(SignalError::EmptySeries {
                symbol: symbol.to_string(),
            });
        }

        let pipeline = Arc::clone(&self.pipeline);
        let symbol = symbol.to_string();
        tokio::task::spawn_blocking(move || pipeline.run(&symbol, &series, start, end))
            .await
            .map_err(|e| SignalError::Worker(e.to_string()))?
    }
}
