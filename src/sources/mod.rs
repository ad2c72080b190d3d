//! Market data sources.
//!
//! A source turns `(symbol, start, end)` into a daily [`PriceSeries`]. An
//! unknown symbol or a range without trading days yields an empty series
//! rather than an error.

pub mod memory;
pub mod yahoo;

pub use memory::InMemorySource;
pub use yahoo::YahooFinanceClient;

use crate::types::PriceSeries;
use chrono::NaiveDate;
use thiserror::Error;

/// Market data fetch failures.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: HTTP {0}")]
    Status(u16),

    #[error("Market data error: {code} - {description}")]
    Api { code: String, description: String },

    #[error("Malformed market data: {0}")]
    Malformed(String),
}

/// Provider of daily price history.
#[axum::async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Fetch daily bars for `symbol` with dates in `[start, end)`.
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, SourceError>;
}
