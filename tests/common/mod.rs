//! Shared fixtures for integration tests.

#![allow(dead_code)]

use augur::config::Config;
use augur::sources::InMemorySource;
use augur::types::{PriceBar, PriceSeries};
use augur::AppState;
use chrono::{Datelike, NaiveDate, Weekday};
use std::sync::Arc;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Weekdays in `[start, end)`.
pub fn weekdays(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d < end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

/// One bar per weekday in `[start, end)`, priced by `price(index)`.
pub fn series_with(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    price: impl Fn(usize) -> f64,
) -> PriceSeries {
    let bars = weekdays(start, end)
        .into_iter()
        .enumerate()
        .map(|(i, d)| PriceBar::flat(d, price(i)))
        .collect();
    PriceSeries::new(symbol, bars)
}

/// Steadily rising prices over Q1 2020 (65 trading days).
pub fn rising_q1(symbol: &str) -> PriceSeries {
    series_with(symbol, date(2020, 1, 1), date(2020, 4, 1), |i| 100.0 + i as f64)
}

/// Steadily falling prices over Q1 2020.
pub fn falling_q1(symbol: &str) -> PriceSeries {
    series_with(symbol, date(2020, 1, 1), date(2020, 4, 1), |i| 200.0 - i as f64)
}

pub fn state(source: InMemorySource) -> AppState {
    AppState::new(Config::default(), Arc::new(source))
}
