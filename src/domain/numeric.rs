//! Lenient coercion of ERP field values

use serde_json::Value;

fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Coerce a field to an integer, truncating toward zero.
///
/// Missing, empty, malformed, non-finite or out-of-range values yield `default`.
pub fn as_int(value: Option<&Value>, default: i64) -> i64 {
    let Some(value) = value else {
        return default;
    };

    if let Some(n) = value.as_i64() {
        return n;
    }

    match parse_float(value) {
        Some(f) if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 => f.trunc() as i64,
        _ => default,
    }
}

/// Coerce a field to a float. Missing, empty or malformed values yield `default`.
pub fn as_float(value: Option<&Value>, default: f64) -> f64 {
    value.and_then(parse_float).unwrap_or(default)
}

/// Coerce a field to text; null and missing become an empty string.
pub fn as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(false)) => String::new(),
        Some(other) => other.to_string(),
    }
}
