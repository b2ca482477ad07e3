//! Total coercion helpers for loosely typed report rows.
//!
//! Nothing in here fails: values that cannot be read as the wanted type come
//! back as `None` (table columns) or as the caller's default (metric cards).

use serde_json::{Map, Value};

pub type Row = Map<String, Value>;

/// Read a value as a finite `f64`. Numeric strings are accepted.
pub fn opt_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Read a value as an integer, truncating fractional numbers.
pub fn opt_int(value: Option<&Value>) -> Option<i64> {
    if let Some(Value::Number(n)) = value {
        if let Some(i) = n.as_i64() {
            return Some(i);
        }
    }
    opt_number(value).map(|n| n.trunc() as i64)
}

pub fn number_or(value: Option<&Value>, default: f64) -> f64 {
    opt_number(value).unwrap_or(default)
}

pub fn int_or(value: Option<&Value>, default: i64) -> i64 {
    opt_int(value).unwrap_or(default)
}

/// Strings only; anything else is treated as missing.
pub fn opt_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Strings as-is, numbers rendered as display labels (`7.0` -> `"7"`).
pub fn opt_label(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                let f = n.as_f64()?;
                if !f.is_finite() {
                    None
                } else if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    Some((f as i64).to_string())
                } else {
                    Some(f.to_string())
                }
            }
        }
        _ => None,
    }
}

pub fn opt_bool(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Format a ratio in `[0, 1]` as a percentage with one decimal place.
pub fn format_percent(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) if r.is_finite() => format!("{:.1}%", r * 100.0),
        _ => "-".to_string(),
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Remove every listed alias from `row` and return the first one that reads
/// as the wanted type. All aliases go so none of them leaks into a record's
/// `extra` map.
fn take_first<T>(row: &mut Row, aliases: &[&str], read: impl Fn(Option<&Value>) -> Option<T>) -> Option<T> {
    let mut found = None;
    for key in aliases {
        if let Some(value) = row.remove(*key) {
            if found.is_none() {
                found = read(Some(&value));
            }
        }
    }
    found
}

pub fn take_number(row: &mut Row, aliases: &[&str]) -> Option<f64> {
    take_first(row, aliases, opt_number)
}

pub fn take_int(row: &mut Row, aliases: &[&str]) -> Option<i64> {
    take_first(row, aliases, opt_int)
}

pub fn take_text(row: &mut Row, aliases: &[&str]) -> Option<String> {
    take_first(row, aliases, opt_text)
}

pub fn take_label(row: &mut Row, aliases: &[&str]) -> Option<String> {
    take_first(row, aliases, opt_label)
}

pub fn take_bool(row: &mut Row, aliases: &[&str]) -> Option<bool> {
    take_first(row, aliases, opt_bool)
}
