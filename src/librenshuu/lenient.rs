//! Deserializers that coerce odd JSON instead of rejecting it: `null` and
//! missing values become empty, numbers and booleans become their text.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?))
}

/// Like [`lenient_string`], with blank values read as `None`.
pub(crate) fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = value_to_string(Value::deserialize(deserializer)?);
    Ok(if value.trim().is_empty() {
        None
    } else {
        Some(value)
    })
}

pub(crate) fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(values) => Ok(values.into_iter().map(value_to_string).collect()),
        _ => Ok(Vec::new()),
    }
}

/// Array elements that are JSON objects. Anything else reads as empty.
pub(crate) fn lenient_objects<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(values) => Ok(values.into_iter().filter(Value::is_object).collect()),
        _ => Ok(Vec::new()),
    }
}
