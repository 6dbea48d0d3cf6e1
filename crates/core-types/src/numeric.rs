//! Coercion of loosely typed numeric input into finite `f64` values.
//!
//! Everything that enters a calculation from persisted or user-entered data goes
//! through one of these helpers, so downstream arithmetic never sees NaN or an
//! infinity it did not produce itself.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

/// Returns `value` when it is finite, otherwise `fallback`.
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Coerces an arbitrary JSON value to a finite number.
///
/// Numbers and numeric strings are accepted. `null`, booleans, arrays, objects,
/// unparseable strings and non-finite results all yield `fallback`.
pub fn coerce(value: &Value, fallback: f64) -> f64 {
    coerce_optional(value).unwrap_or(fallback)
}

/// Like [`coerce`], but reports "no usable number" as `None` instead of a fallback.
/// Used for optional fields where absence carries meaning.
pub fn coerce_optional(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Converts a decimal to `f64`, falling back to 0 when it cannot be represented.
pub fn from_decimal(value: Decimal) -> f64 {
    value.to_f64().map_or(0.0, |v| finite_or(v, 0.0))
}
