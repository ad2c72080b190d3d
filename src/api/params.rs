//! Query parameter parsing and validation.
//!
//! Parameters arrive as optional strings so that a missing or malformed value
//! surfaces as a validation error instead of an extractor rejection.

use crate::error::AppError;
use crate::types::{RangeRequest, SignalRequest};
use chrono::NaiveDate;
use serde::Deserialize;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw `stocks` + date range query.
#[derive(Debug, Default, Deserialize)]
pub struct SymbolRangeQuery {
    pub stocks: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Raw date range query.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, AppError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("Missing required parameter: {}", name)))
}

fn parse_date(value: &Option<String>, name: &str) -> Result<NaiveDate, AppError> {
    let raw = required(value, name)?;
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        AppError::Validation(format!("Invalid {} '{}': expected YYYY-MM-DD", name, raw))
    })
}

/// Comma-separated symbols, trimmed and de-duplicated in order. Symbols match
/// case-insensitively and the first spelling is kept.
fn parse_symbols(value: &Option<String>) -> Result<Vec<String>, AppError> {
    let raw = required(value, "stocks")?;

    let mut symbols: Vec<String> = Vec::new();
    for symbol in raw.split(',').map(str::trim) {
        if symbol.is_empty() {
            return Err(AppError::Validation(format!(
                "Invalid stocks '{}': empty symbol",
                raw
            )));
        }
        if !symbols.iter().any(|s| s.eq_ignore_ascii_case(symbol)) {
            symbols.push(symbol.to_string());
        }
    }

    Ok(symbols)
}

fn parse_range(start: &Option<String>, end: &Option<String>) -> Result<RangeRequest, AppError> {
    let start = parse_date(start, "start_date")?;
    let end = parse_date(end, "end_date")?;

    if start > end {
        return Err(AppError::Validation(format!(
            "start_date {} is after end_date {}",
            start, end
        )));
    }

    Ok(RangeRequest { start, end })
}

impl TryFrom<RangeQuery> for RangeRequest {
    type Error = AppError;

    fn try_from(query: RangeQuery) -> Result<Self, Self::Error> {
        parse_range(&query.start_date, &query.end_date)
    }
}

impl TryFrom<SymbolRangeQuery> for SignalRequest {
    type Error = AppError;

    fn try_from(query: SymbolRangeQuery) -> Result<Self, Self::Error> {
        let symbols = parse_symbols(&query.stocks)?;
        let range = parse_range(&query.start_date, &query.end_date)?;

        Ok(SignalRequest {
            symbols,
            start: range.start,
            end: range.end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(stocks: Option<&str>, start: Option<&str>, end: Option<&str>) -> SymbolRangeQuery {
        SymbolRangeQuery {
            stocks: stocks.map(String::from),
            start_date: start.map(String::from),
            end_date: end.map(String::from),
        }
    }

    fn validation_message(result: Result<SignalRequest, AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_request() {
        let request = SignalRequest::try_from(query(
            Some("AAPL, MSFT"),
            Some("2020-01-01"),
            Some("2020-04-01"),
        ))
        .unwrap();

        assert_eq!(request.symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(request.start, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(request.end, NaiveDate::from_ymd_opt(2020, 4, 1).unwrap());
    }

    #[test]
    fn test_duplicate_symbols_collapsed() {
        let request = SignalRequest::try_from(query(
            Some("AAPL,MSFT,AAPL"),
            Some("2020-01-01"),
            Some("2020-04-01"),
        ))
        .unwrap();

        assert_eq!(request.symbols, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_duplicate_symbols_ignore_case() {
        let request = SignalRequest::try_from(query(
            Some("aapl,AAPL,Msft,MSFT"),
            Some("2020-01-01"),
            Some("2020-04-01"),
        ))
        .unwrap();

        assert_eq!(request.symbols, vec!["aapl", "Msft"]);
    }

    #[test]
    fn test_missing_stocks() {
        let msg = validation_message(SignalRequest::try_from(query(
            None,
            Some("2020-01-01"),
            Some("2020-04-01"),
        )));
        assert!(msg.contains("stocks"));

        let msg = validation_message(SignalRequest::try_from(query(
            Some("  "),
            Some("2020-01-01"),
            Some("2020-04-01"),
        )));
        assert!(msg.contains("stocks"));
    }

    #[test]
    fn test_empty_symbol() {
        let msg = validation_message(SignalRequest::try_from(query(
            Some("AAPL,,MSFT"),
            Some("2020-01-01"),
            Some("2020-04-01"),
        )));
        assert!(msg.contains("empty symbol"));
    }

    #[test]
    fn test_missing_dates() {
        let msg = validation_message(SignalRequest::try_from(query(Some("AAPL"), None, Some("2020-04-01"))));
        assert!(msg.contains("start_date"));

        let msg = validation_message(SignalRequest::try_from(query(Some("AAPL"), Some("2020-01-01"), None)));
        assert!(msg.contains("end_date"));
    }

    #[test]
    fn test_invalid_date_format() {
        let msg = validation_message(SignalRequest::try_from(query(
            Some("AAPL"),
            Some("01/01/2020"),
            Some("2020-04-01"),
        )));
        assert!(msg.contains("YYYY-MM-DD"));

        let msg = validation_message(SignalRequest::try_from(query(
            Some("AAPL"),
            Some("2020-01-01"),
            Some("2020-02-30"),
        )));
        assert!(msg.contains("end_date"));
    }

    #[test]
    fn test_start_after_end() {
        let msg = validation_message(SignalRequest::try_from(query(
            Some("AAPL"),
            Some("2020-05-01"),
            Some("2020-04-01"),
        )));
        assert!(msg.contains("after"));
    }

    #[test]
    fn test_start_equals_end_allowed() {
        let range = RangeRequest::try_from(RangeQuery {
            start_date: Some("2020-01-01".into()),
            end_date: Some("2020-01-01".into()),
        })
        .unwrap();
        assert_eq!(range.start, range.end);
    }
}
