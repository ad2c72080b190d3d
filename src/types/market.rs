use serde::Serialize;
use std::collections::BTreeMap;

/// Close price per `YYYY-MM-DD` date, in date order.
pub type ClosePrices = BTreeMap<String, f64>;

/// Summed close prices across several symbols.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeMovement {
    #[serde(rename = "Cumulative Close")]
    pub cumulative_close: ClosePrices,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cumulative_movement_serialization() {
        let mut closes = ClosePrices::new();
        closes.insert("2024-01-03".to_string(), 30.5);
        closes.insert("2024-01-02".to_string(), 20.0);

        let json = serde_json::to_value(CumulativeMovement {
            cumulative_close: closes,
        })
        .unwrap();

        assert_eq!(json["Cumulative Close"]["2024-01-02"], 20.0);
        let keys: Vec<_> = json["Cumulative Close"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["2024-01-02", "2024-01-03"]);
    }
}
