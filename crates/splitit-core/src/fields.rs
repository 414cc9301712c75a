//! Raw field-map traversal
//!
//! The recognizer returns a tree of named fields where each field may carry
//! a display string (`content`) and/or a typed value (`valueNumber`,
//! `valueArray`, `valueObject`). Any field can be absent, so every accessor
//! here owns its fallback instead of scattering defaults through the
//! normalizer.

use serde_json::Value;

/// Read a field's `content` string, or the default when the field or its
/// content is missing at any level.
pub fn text<'a>(fields: &'a Value, name: &str, default: &'a str) -> &'a str {
    fields
        .get(name)
        .and_then(|f| f.get("content"))
        .and_then(Value::as_str)
        .unwrap_or(default)
}

/// Read a field's `valueNumber` as a finite f64, defaulting to 0.0.
///
/// The service sometimes emits numeric values as strings ("4.50"); those
/// are parsed. Unparseable or non-finite values degrade to 0.0 rather
/// than failing.
pub fn number(fields: &Value, name: &str) -> f64 {
    fields
        .get(name)
        .and_then(|f| f.get("valueNumber"))
        .and_then(coerce_number)
        .unwrap_or(0.0)
}

/// Read a field's `valueArray`, or an empty slice when absent.
pub fn array<'a>(fields: &'a Value, name: &str) -> &'a [Value] {
    fields
        .get(name)
        .and_then(|f| f.get("valueArray"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// An array entry's `valueObject` member map, if it has one.
pub fn object(entry: &Value) -> Option<&Value> {
    entry.get("valueObject")
}

fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
