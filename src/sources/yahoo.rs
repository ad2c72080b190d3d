//! Daily price history from the Yahoo Finance chart API.
//!
//! Provides daily OHLC plus adjusted close for stocks, ETFs and indices
//! through the unofficial v8 chart API.

use super::{MarketDataSource, SourceError};
use crate::config::Config;
use crate::types::{PriceBar, PriceSeries};
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Top-level chart payload.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
    #[serde(default)]
    adjclose: Option<Vec<YahooAdjClose>>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

#[derive(Debug, Deserialize)]
struct YahooAdjClose {
    adjclose: Option<Vec<Option<f64>>>,
}

/// Normalize symbol for Yahoo Finance API.
/// Yahoo uses hyphens instead of dots for share classes (e.g., BRK-B not BRK.B)
fn normalize_yahoo_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase().replace('.', "-")
}

/// Midnight UTC of `date` as a unix timestamp.
fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Convert a chart payload into a series. A "Not Found" payload or a result
/// without timestamps is an empty series.
fn parse_chart(symbol: &str, data: YahooChartResponse) -> Result<PriceSeries, SourceError> {
    if let Some(error) = data.chart.error {
        if error.code.eq_ignore_ascii_case("not found") {
            return Ok(PriceSeries::empty(symbol));
        }
        return Err(SourceError::Api {
            code: error.code,
            description: error.description,
        });
    }

    let Some(result) = data.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::empty(symbol));
    };

    let Some(timestamps) = result.timestamp else {
        return Ok(PriceSeries::empty(symbol));
    };

    let offset = result.meta.gmtoffset.unwrap_or(0);

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::Malformed("No quote data in response".to_string()))?;

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();
    let adj_closes = result
        .indicators
        .adjclose
        .and_then(|a| a.into_iter().next())
        .and_then(|a| a.adjclose);

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        // Rows without a close are holidays or halted sessions
        let Some(close) = closes.get(i).copied().flatten() else {
            continue;
        };

        let date = DateTime::from_timestamp(timestamp + offset, 0)
            .ok_or_else(|| SourceError::Malformed(format!("Invalid timestamp {}", timestamp)))?
            .date_naive();

        let adj_close = match &adj_closes {
            Some(values) => values.get(i).copied().flatten(),
            None => Some(close),
        };

        bars.push(PriceBar {
            date,
            open: opens.get(i).copied().flatten().unwrap_or(close),
            high: highs.get(i).copied().flatten().unwrap_or(close),
            low: lows.get(i).copied().flatten().unwrap_or(close),
            close,
            adj_close,
            volume: volumes.get(i).copied().flatten().unwrap_or(0) as f64,
        });
    }

    Ok(PriceSeries::new(symbol, bars))
}

/// Client for the v8 chart endpoint.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client. Without a timeout the transport
    /// default applies.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, SourceError> {
        let mut builder = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        Self::new(
            config.yahoo_base_url.clone(),
            config.fetch_timeout_secs.map(Duration::from_secs),
        )
    }

    /// Fetch daily history for a symbol over `[start, end)`.
    pub async fn get_daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, SourceError> {
        if start >= end {
            return Ok(PriceSeries::empty(symbol));
        }

        let yahoo_symbol = normalize_yahoo_symbol(symbol);
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            yahoo_symbol.replace('^', "%5E")
        );

        debug!("Fetching Yahoo Finance data: {} {}..{}", yahoo_symbol, start, end);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", unix_midnight(start).to_string()),
                ("period2", unix_midnight(end).to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
                ("includeAdjustedClose", "true".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Yahoo Finance has no data for {}", yahoo_symbol);
            return Ok(PriceSeries::empty(symbol));
        }
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let data: YahooChartResponse = response.json().await?;
        let series = parse_chart(symbol, data)?;

        // Yahoo may include a bar stamped on the end date itself
        Ok(series.between(start, end))
    }
}

#[axum::async_trait]
impl MarketDataSource for YahooFinanceClient {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, SourceError> {
        self.get_daily_history(symbol, start, end).await
    }
}
