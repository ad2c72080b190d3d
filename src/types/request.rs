use chrono::NaiveDate;

/// Validated symbols-and-range query, used by `/generate_signals` and
/// `/get_cumulative_movement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalRequest {
    /// Distinct symbols in request order.
    pub symbols: Vec<String>,
    pub start: NaiveDate,
    /// Exclusive end date.
    pub end: NaiveDate,
}

/// Validated date range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    pub start: NaiveDate,
    /// Exclusive end date.
    pub end: NaiveDate,
}
