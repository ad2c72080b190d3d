use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily observation for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Split/dividend adjusted close. `None` when the feed reports a gap.
    pub adj_close: Option<f64>,
    pub volume: f64,
}

impl PriceBar {
    /// Bar with every price set to `price` and no volume.
    pub fn flat(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            open: price,
            high: price,
            low: price,
            close: price,
            adj_close: Some(price),
            volume: 0.0,
        }
    }
}

/// Daily price history for one symbol, ascending by date with unique dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series, sorting by date and keeping the first bar seen for each date.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Vec::new())
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bars whose date falls in `[start, end)`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: self.symbol.clone(),
            bars: self
                .bars
                .iter()
                .filter(|b| b.date >= start && b.date < end)
                .cloned()
                .collect(),
        }
    }
}
