use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of features in a [`FeatureRow`].
pub const FEATURE_COUNT: usize = 3;

/// Derived inputs for one trading day. Every field is defined; rows with an
/// undefined feature are never constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRow {
    pub date: NaiveDate,
    /// Fractional change in adjusted close from the prior trading day.
    pub daily_return: f64,
    /// Trailing mean of adjusted close.
    pub moving_average: f64,
    /// Trailing sample standard deviation of daily returns.
    pub volatility: f64,
}

impl FeatureRow {
    /// Feature vector in classifier order: return, moving average, volatility.
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        [self.daily_return, self.moving_average, self.volatility]
    }

    /// Attach the return-direction label used for training.
    pub fn labeled(self) -> LabeledFeatureRow {
        LabeledFeatureRow {
            label: u8::from(self.daily_return > 0.0),
            row: self,
        }
    }
}

/// Feature row with its binary up/down label (1 if the return was positive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledFeatureRow {
    pub row: FeatureRow,
    pub label: u8,
}

/// Categorical trading signal for one aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalLabel {
    Buy,
    Hold,
    Sell,
}

impl SignalLabel {
    /// Upper band: a mean prediction at or above this is a buy.
    pub const BUY_THRESHOLD: f64 = 0.7;
    /// Lower band: a mean prediction at or below this is a sell.
    pub const SELL_THRESHOLD: f64 = 0.4;

    /// Map the fraction of "up" predictions in a window to a signal.
    pub fn from_mean(mean: f64) -> Self {
        if mean >= Self::BUY_THRESHOLD {
            SignalLabel::Buy
        } else if mean > Self::SELL_THRESHOLD {
            SignalLabel::Hold
        } else {
            SignalLabel::Sell
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalLabel::Buy => "Buy",
            SignalLabel::Hold => "Hold",
            SignalLabel::Sell => "Sell",
        }
    }
}

impl fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open date interval `[start, end)` used to group feature rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SignalWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Output signal, dated by the start of its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
    pub signal: SignalLabel,
}

/// `YYYY-MM-DD` date encoding.
mod iso_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
