//! Null-tolerant field decoders for backend documents.
//!
//! The backend stores loosely validated records: a field may be missing, `null`, or hold a number
//! where a string is expected (and the other way round). These decoders map such values to the
//! field's natural default so one odd field never drops the whole record from a list.
//!
//! Use them together with `#[serde(default)]` so missing fields behave the same as `null` ones.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(opt_string(deserializer)?.unwrap_or_default())
}

pub fn opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(opt_number(deserializer)?.unwrap_or_default())
}

pub fn opt_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(as_f64(&Value::deserialize(deserializer)?))
}

/// Whole numbers; `1.0` and `"1"` both read as 1.
pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| as_f64(&value).map(|f| f as i64))
        .unwrap_or_default())
}

/// Non-negative whole numbers. Negative values read as 0.
pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    integer(deserializer).map(|n| u32::try_from(n).unwrap_or(0))
}

pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    })
}

/// An array of records. Anything but an array is empty, and entries that do not decode are
/// skipped.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Sample {
        #[serde(default, deserialize_with = "string")]
        name: String,
        #[serde(default, deserialize_with = "number")]
        price: f64,
        #[serde(default, deserialize_with = "integer")]
        position: i64,
        #[serde(default, deserialize_with = "count")]
        quantity: u32,
        #[serde(default, deserialize_with = "flag")]
        active: bool,
        #[serde(default, deserialize_with = "list")]
        tags: Vec<String>,
    }

    #[test]
    fn nulls_read_as_defaults() {
        let sample: Sample = serde_json::from_value(json!({
            "name": null, "price": null, "position": null,
            "quantity": null, "active": null, "tags": null,
        }))
        .unwrap();
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn mistyped_values_are_coerced() {
        let sample: Sample = serde_json::from_value(json!({
            "name": 42, "price": "499.5", "position": 1.0,
            "quantity": -3, "active": "true", "tags": ["a", 7, "b"],
        }))
        .unwrap();

        assert_eq!(sample.name, "42");
        assert_eq!(sample.price, 499.5);
        assert_eq!(sample.position, 1);
        assert_eq!(sample.quantity, 0);
        assert!(sample.active);
        assert_eq!(sample.tags, ["a", "b"]);
    }
}
