//! Forgiving field deserializers
//!
//! Report requests come from form state where any numeric field may be
//! missing, blank, a formatted string (`"$1,200"`, `"7.5%"`) or outright
//! garbage. Every field decodes to `Option<T>`; anything that is not a usable
//! value becomes `None` and the caller substitutes its documented default.

use log::warn;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use std::fmt;

/// Decode a number, numeric string, or null. Non-finite results are dropped.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(NumberVisitor)
}

/// Decode a boolean, `"true"`/`"false"`/`"yes"`/`"no"`, or 0/1.
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(FlagVisitor)
}

/// Parse a loosely formatted number. Currency symbols, thousands separators,
/// percent signs and surrounding whitespace are ignored.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | ' ' | '_'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn finite(v: f64) -> Option<f64> {
    if v.is_finite() {
        Some(v)
    } else {
        warn!("ignoring non-finite numeric input {}", v);
        None
    }
}

struct NumberVisitor;

impl<'de> Visitor<'de> for NumberVisitor {
    type Value = Option<f64>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, a numeric string, or null")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(finite(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let parsed = parse_number(v);
        if parsed.is_none() && !v.trim().is_empty() {
            warn!("ignoring unparseable numeric input {:?}", v);
        }
        Ok(parsed)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        warn!("ignoring boolean {} where a number was expected", v);
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(NumberVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        warn!("ignoring array where a number was expected");
        Ok(None)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        warn!("ignoring object where a number was expected");
        Ok(None)
    }
}

struct FlagVisitor;

impl<'de> Visitor<'de> for FlagVisitor {
    type Value = Option<bool>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a boolean, a boolean-like string, or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v != 0))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v != 0))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(finite(v).map(|v| v != 0.0))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        match v.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "on" => Ok(Some(true)),
            "false" | "no" | "n" | "0" | "off" => Ok(Some(false)),
            "" => Ok(None),
            other => {
                warn!("ignoring unparseable flag {:?}", other);
                Ok(None)
            }
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(FlagVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "number")]
        value: Option<f64>,
        #[serde(default, deserialize_with = "flag")]
        enabled: Option<bool>,
    }

    fn decode(json: &str) -> Sample {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_number_formats() {
        assert_eq!(parse_number("$1,200"), Some(1200.0));
        assert_eq!(parse_number(" 7.5% "), Some(7.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_number_field_variants() {
        assert_eq!(decode(r#"{"value": 12.5}"#).value, Some(12.5));
        assert_eq!(decode(r#"{"value": 3}"#).value, Some(3.0));
        assert_eq!(decode(r#"{"value": "4,000"}"#).value, Some(4000.0));
        assert_eq!(decode(r#"{"value": null}"#).value, None);
        assert_eq!(decode(r#"{"value": "n/a"}"#).value, None);
        assert_eq!(decode(r#"{"value": [1, 2]}"#).value, None);
        assert_eq!(decode(r#"{"value": {"a": 1}}"#).value, None);
        assert_eq!(decode(r#"{}"#).value, None);
    }

    #[test]
    fn test_flag_field_variants() {
        assert_eq!(decode(r#"{"enabled": true}"#).enabled, Some(true));
        assert_eq!(decode(r#"{"enabled": "no"}"#).enabled, Some(false));
        assert_eq!(decode(r#"{"enabled": 1}"#).enabled, Some(true));
        assert_eq!(decode(r#"{"enabled": "maybe"}"#).enabled, None);
    }
}
