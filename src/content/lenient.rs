//! Lenient field decoders.
//!
//! Content comes from hand-edited JSON, local storage and imports, so
//! decoding never rejects a document: malformed fields degrade to their
//! empty value instead.

use crate::theme::Theme;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Scalar to string: strings as-is, numbers and booleans formatted,
/// everything else empty.
pub fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Parse a numeric input and clamp it into `[min, max]`.
///
/// Numbers and numeric strings are accepted (an empty string reads as 0);
/// anything non-numeric or non-finite yields `fallback`.
///
/// ```ignore
/// clamp_number(&json!(150), 0.0, 100.0, 0.0)   // 100.0
/// clamp_number(&json!("abc"), 0.0, 100.0, 0.0) // 0.0
/// ```
pub fn clamp_number(value: &Value, min: f64, max: f64, fallback: f64) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() => n.clamp(min, max),
        _ => fallback,
    }
}

/// Skill level in `0..=100`, rounded to an integer.
pub fn level_of(value: &Value) -> u8 {
    // Clamped to 0..=100 so the cast cannot truncate.
    clamp_number(value, 0.0, 100.0, 0.0).round() as u8
}

// ============================================================================
// serde `deserialize_with` adapters
// ============================================================================

pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(scalar_string(&Value::deserialize(d)?))
}

/// Optional string; empty and non-scalar values become `None`.
pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let s = scalar_string(&Value::deserialize(d)?);
    Ok((!s.is_empty()).then_some(s))
}

/// Sequence of strings; non-arrays become empty, non-scalar items are dropped.
pub fn string_vec<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .iter()
            .filter(|v| matches!(v, Value::String(_) | Value::Number(_) | Value::Bool(_)))
            .map(scalar_string)
            .collect(),
        _ => Vec::new(),
    })
}

/// Sequence of `T`; non-arrays become empty, undecodable items are dropped.
pub fn vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Nested object; anything that does not decode becomes `T::default()`.
pub fn object<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
        _ => T::default(),
    })
}

/// Theme, always renormalized.
pub fn theme<'de, D: Deserializer<'de>>(d: D) -> Result<Theme, D::Error> {
    Ok(Theme::from_value(&Value::deserialize(d)?))
}

pub fn level<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    Ok(level_of(&Value::deserialize(d)?))
}
