//! Forgiving deserializers for optional metadata in third-party responses
//!
//! Upstream APIs change field types without notice. Metadata that arrives in
//! an unexpected shape is dropped rather than failing the whole body.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Any value that does not fit `T` is treated as absent
pub fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// Whole seconds from an integer, a float or a numeric string
pub fn duration<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let seconds = match raw {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().and_then(whole_seconds)),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().and_then(whole_seconds),
        _ => None,
    };
    Ok(seconds)
}

fn whole_seconds(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value.trunc() as u64)
}
