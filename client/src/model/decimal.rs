//! Serde adapters for the backend's decimal fields.
//!
//! Decimal values arrive as strings (`"9.99"`) but older payloads and test
//! fixtures use plain numbers, so both are accepted. Outgoing values are sent
//! as two-decimal strings.

use serde::Deserialize;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Number(f64),
    Text(String),
}

fn parse(raw: RawDecimal) -> Result<f64, String> {
    match raw {
        RawDecimal::Number(value) => Ok(value),
        RawDecimal::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid decimal '{text}': {e}")),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    parse(RawDecimal::deserialize(deserializer)?).map_err(de::Error::custom)
}

pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{value:.2}"))
}

pub fn serialize_option<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(value) => serialize(value, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Deserialize, Serialize)]
    struct Priced {
        #[serde(with = "super")]
        cost: f64,
    }

    #[test]
    fn test_accepts_strings_and_numbers() {
        let text: Priced = serde_json::from_str(r#"{"cost": " 9.99 "}"#).unwrap();
        assert_eq!(text.cost, 9.99);
        let number: Priced = serde_json::from_str(r#"{"cost": 12}"#).unwrap();
        assert_eq!(number.cost, 12.0);
    }

    #[test]
    fn test_rejects_non_numeric_text() {
        let error = serde_json::from_str::<Priced>(r#"{"cost": "abc"}"#).unwrap_err();
        assert!(error.to_string().contains("invalid decimal 'abc'"));
    }

    #[test]
    fn test_serializes_two_decimal_string() {
        let body = serde_json::to_value(Priced { cost: 15.5 }).unwrap();
        assert_eq!(body, serde_json::json!({"cost": "15.50"}));
    }
}
