//! Feature engineering from daily price series.
//!
//! Each output row carries the daily return, the trailing mean of adjusted
//! close and the trailing sample standard deviation of returns. A row is only
//! emitted once all three are defined, so the first `window` bars of a series
//! never produce output.

use crate::types::{FeatureRow, PriceSeries};
use std::collections::VecDeque;

/// Default trailing window length.
pub const DEFAULT_WINDOW: usize = 20;

/// Builds [`FeatureRow`]s from a [`PriceSeries`].
#[derive(Debug, Clone, Copy)]
pub struct FeatureBuilder {
    window: usize,
}

impl FeatureBuilder {
    /// Builder with a trailing window of `window` observations (at least 2).
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(2),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Derive feature rows in date order, dropping rows with undefined features.
    pub fn build(&self, series: &PriceSeries) -> Vec<FeatureRow> {
        let bars = series.bars();
        if bars.len() <= self.window {
            return Vec::new();
        }

        let mut prices: VecDeque<Option<f64>> = VecDeque::with_capacity(self.window + 1);
        let mut returns: VecDeque<Option<f64>> = VecDeque::with_capacity(self.window + 1);
        let mut previous: Option<Option<f64>> = None;
        let mut rows = Vec::with_capacity(bars.len() - self.window);

        for bar in bars {
            let price = bar.adj_close.filter(|p| p.is_finite());
            let daily_return = previous.and_then(|prev| pct_change(prev, price));
            previous = Some(price);

            push_bounded(&mut prices, price, self.window);
            push_bounded(&mut returns, daily_return, self.window);

            let (Some(daily_return), Some(moving_average), Some(volatility)) = (
                daily_return,
                window_mean(&prices, self.window),
                window_std(&returns, self.window),
            ) else {
                continue;
            };

            rows.push(FeatureRow {
                date: bar.date,
                daily_return,
                moving_average,
                volatility,
            });
        }

        rows
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// Build features with the default 20-observation window.
pub fn build_features(series: &PriceSeries) -> Vec<FeatureRow> {
    FeatureBuilder::default().build(series)
}

/// Fractional change from `previous` to `current`. Undefined when either is
/// missing or the previous price is zero.
fn pct_change(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    let (previous, current) = (previous?, current?);
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous).filter(|r| r.is_finite())
}

fn push_bounded(window: &mut VecDeque<Option<f64>>, value: Option<f64>, capacity: usize) {
    window.push_back(value);
    while window.len() > capacity {
        window.pop_front();
    }
}

/// Values of a full window with no gaps.
fn complete(window: &VecDeque<Option<f64>>, size: usize) -> Option<Vec<f64>> {
    if window.len() < size {
        return None;
    }
    window.iter().copied().collect()
}

fn window_mean(window: &VecDeque<Option<f64>>, size: usize) -> Option<f64> {
    let values = complete(window, size)?;
    Some(values.iter().sum::<f64>() / values.len() as f64).filter(|m| m.is_finite())
}

/// Sample standard deviation (n - 1 denominator).
fn window_std(window: &VecDeque<Option<f64>>, size: usize) -> Option<f64> {
    let values = complete(window, size)?;
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt()).filter(|s| s.is_finite())
}
