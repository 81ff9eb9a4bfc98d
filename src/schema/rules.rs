//! Primitive checks and field combinators shared by the record validators

use serde_json::{Map, Value};

use super::Result;
use super::path::Path;
use crate::model::{Choice, Field};

const REQUIRED: &str = "is required";
const OBJECT: &str = "expected an object";
const ARRAY: &str = "expected an array";
const STRING: &str = "must be a string";
const NON_EMPTY: &str = "must be a non-empty string";
const NUMBER: &str = "must be a number";
const NON_NEGATIVE: &str = "must be a non-negative number";
const POSITIVE_INT: &str = "must be a positive integer";
const BOOLEAN: &str = "must be a boolean";
const PRIMITIVE: &str = "must be a string, number or boolean";

pub fn object<'v>(value: &'v Value, path: &Path<'_>) -> Result<&'v Map<String, Value>> {
    value.as_object().ok_or_else(|| path.error(OBJECT))
}

pub fn string(value: &Value, path: &Path<'_>) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| path.error(STRING))
}

pub fn non_empty(value: &Value, path: &Path<'_>) -> Result<String> {
    match value.as_str() {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(path.error(NON_EMPTY)),
    }
}

/// Strings pass as-is; numbers and booleans become their text form
pub fn coerced_string(value: &Value, path: &Path<'_>) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            // 2.0 reads back as "2", the way a JS consumer would print it
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
            _ => n.to_string(),
        }),
        _ => Err(path.error(PRIMITIVE)),
    }
}

pub fn number(value: &Value, path: &Path<'_>) -> Result<f64> {
    value.as_f64().ok_or_else(|| path.error(NUMBER))
}

pub fn non_negative(value: &Value, path: &Path<'_>) -> Result<f64> {
    match value.as_f64() {
        Some(n) if n >= 0.0 => Ok(n),
        _ => Err(path.error(NON_NEGATIVE)),
    }
}

/// Integral, strictly above zero, and within `u32`
pub fn positive_int(value: &Value, path: &Path<'_>) -> Result<u32> {
    match value.as_f64() {
        Some(n) if n.fract() == 0.0 && n > 0.0 && n <= u32::MAX as f64 => Ok(n as u32),
        _ => Err(path.error(POSITIVE_INT)),
    }
}

pub fn between(min: f64, max: f64) -> impl Fn(&Value, &Path<'_>) -> Result<f64> {
    move |value: &Value, path: &Path<'_>| match value.as_f64() {
        Some(n) if (min..=max).contains(&n) => Ok(n),
        _ => Err(path.error(format!("must be a number between {min} and {max}"))),
    }
}

/// Tag field that must hold exactly `expected`
pub fn literal(expected: &'static str) -> impl Fn(&Value, &Path<'_>) -> Result<()> {
    move |value: &Value, path: &Path<'_>| match value.as_str() {
        Some(s) if s == expected => Ok(()),
        _ => Err(path.error(format!("must be \"{expected}\""))),
    }
}

pub fn boolean(value: &Value, path: &Path<'_>) -> Result<bool> {
    value.as_bool().ok_or_else(|| path.error(BOOLEAN))
}

pub fn choice<T: Choice>(value: &Value, path: &Path<'_>) -> Result<T> {
    value
        .as_str()
        .and_then(T::parse)
        .ok_or_else(|| path.error(format!("must be one of: {}", T::expected())))
}

/// Every element checked in index order
pub fn list<T>(
    value: &Value,
    path: &Path<'_>,
    item: impl Fn(&Value, &Path<'_>) -> Result<T>,
) -> Result<Vec<T>> {
    let items = value.as_array().ok_or_else(|| path.error(ARRAY))?;
    items
        .iter()
        .enumerate()
        .map(|(index, v)| item(v, &path.index(index)))
        .collect()
}

pub fn required<T>(
    map: &Map<String, Value>,
    key: &str,
    path: &Path<'_>,
    check: impl FnOnce(&Value, &Path<'_>) -> Result<T>,
) -> Result<T> {
    let path = path.key(key);
    match map.get(key) {
        Some(value) => check(value, &path),
        None => Err(path.error(REQUIRED)),
    }
}

/// Absent is fine; present (even as null) must pass `check`
pub fn optional<T>(
    map: &Map<String, Value>,
    key: &str,
    path: &Path<'_>,
    check: impl FnOnce(&Value, &Path<'_>) -> Result<T>,
) -> Result<Option<T>> {
    map.get(key).map(|value| check(value, &path.key(key))).transpose()
}

/// Absent and null are both valid and kept apart
pub fn nullable<T>(
    map: &Map<String, Value>,
    key: &str,
    path: &Path<'_>,
    check: impl FnOnce(&Value, &Path<'_>) -> Result<T>,
) -> Result<Field<T>> {
    Ok(match map.get(key) {
        None => Field::Absent,
        Some(Value::Null) => Field::Null,
        Some(value) => Field::Value(check(value, &path.key(key))?),
    })
}

/// Missing collection reads as empty
pub fn defaulted_list<T>(
    map: &Map<String, Value>,
    key: &str,
    path: &Path<'_>,
    item: impl Fn(&Value, &Path<'_>) -> Result<T>,
) -> Result<Vec<T>> {
    match map.get(key) {
        Some(value) => list(value, &path.key(key), item),
        None => Ok(Vec::new()),
    }
}
