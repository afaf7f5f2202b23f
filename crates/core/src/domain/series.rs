use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily close on the chart. Future points carry `predicted = true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
    #[serde(default)]
    pub predicted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn predicted_defaults_to_false_on_the_wire() {
        let v = json!({ "date": "2024-01-02", "price": 101.5 });
        let p: PricePoint = serde_json::from_value(v).unwrap();
        assert_eq!(p.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(!p.predicted);
    }
}
