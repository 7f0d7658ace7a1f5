//! Scanning result rows into generic maps.

use std::collections::BTreeMap;

use serde_json::{Number, Value};
use sqlx::any::AnyRow;
use sqlx::{Column, Row};

/// Converts a row to a map from column name to JSON value.
///
/// Each column is decoded as the first of bool, integer, float, text or
/// bytes that the driver accepts; bytes become lossy UTF-8 text and
/// undecodable values become `null`.
#[must_use]
pub fn row_to_map(row: &AnyRow) -> BTreeMap<String, Value> {
    row.columns()
        .iter()
        .map(|column| (column.name().to_string(), column_value(row, column.ordinal())))
        .collect()
}

fn column_value(row: &AnyRow, index: usize) -> Value {
    if let Ok(value) = row.try_get::<Option<bool>, _>(index) {
        return value.map_or(Value::Null, Value::Bool);
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return value.map_or(Value::Null, Value::from);
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
        return value
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number);
    }
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return value.map_or(Value::Null, Value::String);
    }
    if let Ok(value) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return value.map_or(Value::Null, |bytes| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        });
    }
    Value::Null
}

/// Renders a scanned value as a string; `null` becomes the empty string.
#[must_use]
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Converts a map of JSON values to a map of strings.
#[must_use]
pub fn map_to_strings(map: &BTreeMap<String, Value>) -> BTreeMap<String, String> {
    map.iter()
        .map(|(name, value)| (name.clone(), value_to_string(value)))
        .collect()
}
