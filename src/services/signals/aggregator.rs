//! Reduces per-row predictions to one signal per calendar window.

use super::classifier::SignalClassifier;
use crate::types::{FeatureRow, Signal, SignalLabel, SignalWindow};
use chrono::{Days, NaiveDate};

/// Default window length in calendar days (one quarter).
pub const DEFAULT_WINDOW_DAYS: u32 = 90;

/// Splits a date range into fixed-length windows and labels each one.
#[derive(Debug, Clone, Copy)]
pub struct SignalAggregator {
    window_days: u32,
}

impl SignalAggregator {
    pub fn new(window_days: u32) -> Self {
        Self {
            window_days: window_days.max(1),
        }
    }

    /// Consecutive windows tiling `[start, end)`; the last one is cut at `end`.
    pub fn windows(&self, start: NaiveDate, end: NaiveDate) -> Vec<SignalWindow> {
        let step = Days::new(u64::from(self.window_days));
        let mut windows = Vec::new();
        let mut current = start;

        while current < end {
            let next = current.checked_add_days(step).map_or(end, |d| d.min(end));
            windows.push(SignalWindow {
                start: current,
                end: next,
            });
            current = next;
        }

        windows
    }

    /// One signal per window holding at least one row, in date order.
    /// Windows without rows are skipped.
    pub fn aggregate<C: SignalClassifier>(
        &self,
        classifier: &C,
        model: &C::Model,
        features: &[FeatureRow],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<Signal> {
        self.windows(start, end)
            .into_iter()
            .filter_map(|window| {
                let rows: Vec<FeatureRow> = features
                    .iter()
                    .filter(|r| window.contains(r.date))
                    .copied()
                    .collect();

                let mean = mean_prediction(&classifier.predict(model, &rows))?;
                Some(Signal {
                    date: window.start,
                    signal: SignalLabel::from_mean(mean),
                })
            })
            .collect()
    }
}

impl Default for SignalAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_DAYS)
    }
}

/// Fraction of "up" predictions, or `None` when there are none.
fn mean_prediction(predictions: &[u8]) -> Option<f64> {
    if predictions.is_empty() {
        return None;
    }
    let ups: u32 = predictions.iter().map(|&p| u32::from(p)).sum();
    Some(f64::from(ups) / predictions.len() as f64)
}
