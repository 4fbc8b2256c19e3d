use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Value, json};

use crate::source::Provider;

/// Contents of `current_rate.json`.
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct CurrentRate {
    #[serde(serialize_with = "serialize_rate")]
    pub bcv: f64,
    pub updated: String,
    pub date: String,
}

/// The sample a run appends to the history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub date: String,
    pub bcv: f64,
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn into_value(self) -> Value {
        json!({
            "date": self.date,
            "bcv": rate_value(self.bcv),
            "timestamp": self.timestamp,
        })
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Rates {
    #[serde(serialize_with = "serialize_rate")]
    pub bcv: f64,
    pub source: Provider,
    pub last_update: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AllRates {
    #[serde(serialize_with = "serialize_optional_rate")]
    pub bcv_official: Option<f64>,
    #[serde(serialize_with = "serialize_optional_rate")]
    pub exchange_api: Option<f64>,
    #[serde(serialize_with = "serialize_optional_rate")]
    pub dolar_today: Option<f64>,
}

/// Contents of `rates.json`.
#[derive(Debug, Serialize, PartialEq)]
pub struct FullRate {
    pub timestamp: String,
    pub date: String,
    pub rates: Rates,
    pub all_rates: AllRates,
    /// Earlier entries are carried over verbatim, whatever their shape.
    pub history: Vec<Value>,
}

/// The part of a previous `rates.json` that survives into the next run.
#[derive(Debug, Default, Deserialize)]
pub struct PriorRecord {
    #[serde(default)]
    pub history: Option<Vec<Value>>,
}

// Largest integer an f64 holds exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Whole rates are written without a fractional part (`38`, not `38.0`).
fn as_whole(rate: f64) -> Option<i64> {
    (rate.fract() == 0.0 && rate.abs() < MAX_EXACT_INTEGER).then_some(rate as i64)
}

fn rate_value(rate: f64) -> Value {
    as_whole(rate).map_or_else(|| Value::from(rate), Value::from)
}

fn serialize_rate<S: Serializer>(rate: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    match as_whole(*rate) {
        Some(whole) => serializer.serialize_i64(whole),
        None => serializer.serialize_f64(*rate),
    }
}

fn serialize_optional_rate<S: Serializer>(
    rate: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match rate {
        Some(rate) => serialize_rate(rate, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_rates_have_no_fraction() {
        let current = CurrentRate {
            bcv: 38.0,
            updated: "2026-10-19T12:00:00.000Z".to_string(),
            date: "2026-10-19".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&current).unwrap(),
            r#"{"bcv":38,"updated":"2026-10-19T12:00:00.000Z","date":"2026-10-19"}"#
        );

        let all = AllRates {
            bcv_official: Some(36.5),
            exchange_api: Some(37.0),
            dolar_today: None,
        };
        assert_eq!(
            serde_json::to_string(&all).unwrap(),
            r#"{"bcv_official":36.5,"exchange_api":37,"dolar_today":null}"#
        );
    }

    #[test]
    fn history_entry_keeps_field_order() {
        let entry = HistoryEntry {
            date: "2026-10-19".to_string(),
            bcv: 40.0,
            timestamp: "2026-10-19T12:00:00.000Z".to_string(),
        };
        assert_eq!(
            entry.into_value().to_string(),
            r#"{"date":"2026-10-19","bcv":40,"timestamp":"2026-10-19T12:00:00.000Z"}"#
        );
    }
}
