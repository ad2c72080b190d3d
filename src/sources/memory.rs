//! In-memory market data source backed by preloaded series.

use super::{MarketDataSource, SourceError};
use crate::types::PriceSeries;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serves fixed series keyed by upper-cased symbol. Unknown symbols yield an
/// empty series; symbols registered with [`InMemorySource::with_failure`]
/// return an API error.
#[derive(Default)]
pub struct InMemorySource {
    series: HashMap<String, PriceSeries>,
    failures: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.series.insert(series.symbol.to_uppercase(), series);
        self
    }

    pub fn with_failure(mut self, symbol: &str, description: impl Into<String>) -> Self {
        self.failures
            .insert(symbol.to_uppercase(), description.into());
        self
    }

    /// Number of fetch calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[axum::async_trait]
impl MarketDataSource for InMemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, SourceError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let key = symbol.to_uppercase();

        if let Some(description) = self.failures.get(&key) {
            return Err(SourceError::Api {
                code: "Unavailable".to_string(),
                description: description.clone(),
            });
        }

        Ok(self
            .series
            .get(&key)
            .map(|s| s.between(start, end))
            .unwrap_or_else(|| PriceSeries::empty(symbol)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceBar;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_filters_range() {
        let source = InMemorySource::new().with_series(PriceSeries::new(
            "spy",
            (1..=10).map(|d| PriceBar::flat(date(d), d as f64)).collect(),
        ));

        let series = source.fetch("SPY", date(3), date(6)).await.unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_empty() {
        let source = InMemorySource::new();
        let series = source.fetch("NOPE", date(1), date(5)).await.unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn test_failure_symbol() {
        let source = InMemorySource::new().with_failure("BAD", "feed offline");
        let err = source.fetch("bad", date(1), date(5)).await.unwrap_err();
        assert!(err.to_string().contains("feed offline"));
    }
}
