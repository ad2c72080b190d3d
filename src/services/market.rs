//! Index prices and cumulative close movement.

use crate::error::{AppError, Result};
use crate::sources::MarketDataSource;
use crate::types::{ClosePrices, CumulativeMovement, PriceSeries, RangeRequest, SignalRequest};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn closes(series: &PriceSeries) -> ClosePrices {
    series
        .bars()
        .iter()
        .map(|b| (date_key(b.date), b.close))
        .collect()
}

/// Thin wrappers over the market data source.
pub struct MarketService {
    source: Arc<dyn MarketDataSource>,
}

impl MarketService {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    /// Close prices of `symbol` over the range. A range with no trading days
    /// yields an empty map.
    pub async fn index_closes(&self, symbol: &str, range: RangeRequest) -> Result<ClosePrices> {
        let series = self.source.fetch(symbol, range.start, range.end).await?;
        debug!("{}: {} closes", symbol, series.len());
        Ok(closes(&series))
    }

    /// Sum of close prices per date across all requested symbols. Only dates
    /// on which every symbol traded are included.
    pub async fn cumulative_movement(&self, request: &SignalRequest) -> Result<CumulativeMovement> {
        info!(
            "Summing closes for {} symbols from {} to {}",
            request.symbols.len(),
            request.start,
            request.end
        );

        let mut totals: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for symbol in &request.symbols {
            let series = self.source.fetch(symbol, request.start, request.end).await?;
            if series.is_empty() {
                return Err(AppError::DataFetch(format!(
                    "No price data found for {}",
                    symbol
                )));
            }

            for bar in series.bars() {
                let entry = totals.entry(bar.date).or_insert((0.0, 0));
                entry.0 += bar.close;
                entry.1 += 1;
            }
        }

        let symbol_count = request.symbols.len();
        let cumulative_close = totals
            .into_iter()
            .filter(|(_, (_, count))| *count == symbol_count)
            .map(|(date, (total, _))| (date_key(date), total))
            .collect();

        Ok(CumulativeMovement { cumulative_close })
    }
}
