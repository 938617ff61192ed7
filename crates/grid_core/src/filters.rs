//! Sequence filters over row records.
//!
//! The local pipeline composes these in a fixed order: filter, sort, skip, take.
use std::cmp::Ordering;

use serde_json::Value;

/// A single row record.
pub type Row = Value;

/// Resolves a possibly dotted field path (`"owner.name"`) inside a row.
pub fn field_value<'a>(row: &'a Row, field: &str) -> Option<&'a Value> {
    if let Some(value) = row.get(field) {
        return Some(value);
    }
    let mut current = row;
    for segment in field.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Keeps rows where any scalar leaf contains `term`, ignoring case.
///
/// An empty or absent term returns every row.
pub fn filter_by_term<'a, I>(rows: I, term: Option<&str>) -> Vec<&'a Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    let needle = match term {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => return rows.into_iter().collect(),
    };
    rows.into_iter()
        .filter(|row| value_matches(row, &needle))
        .collect()
}

fn value_matches(value: &Value, needle: &str) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => b.to_string().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Array(items) => items.iter().any(|item| value_matches(item, needle)),
        Value::Object(map) => map.values().any(|item| value_matches(item, needle)),
    }
}

/// Stable sort by the natural ordering of `field`; `reverse` flips the comparison.
pub fn sort_by<'a>(mut rows: Vec<&'a Row>, field: &str, reverse: bool) -> Vec<&'a Row> {
    rows.sort_by(|a, b| {
        let ordering = compare_values(field_value(a, field), field_value(b, field));
        if reverse {
            ordering.reverse()
        } else {
            ordering
        }
    });
    rows
}

/// Numbers compare numerically, everything else by its lowercased text.
/// Missing and null values come first.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => {
            let x = sort_text(x);
            let y = sort_text(y);
            x.to_lowercase()
                .cmp(&y.to_lowercase())
                .then_with(|| x.cmp(&y))
        }
    }
}

fn sort_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Drops the first `n` rows.
pub fn skip<T>(rows: Vec<T>, n: usize) -> Vec<T> {
    if n >= rows.len() {
        return Vec::new();
    }
    let mut rows = rows;
    rows.split_off(n)
}

/// Keeps at most the first `n` rows. `take(rows, 0)` is empty.
pub fn take<T>(mut rows: Vec<T>, n: usize) -> Vec<T> {
    rows.truncate(n);
    rows
}

/// Lenient count parsing for offsets and limits coming from loose input.
///
/// Negative, fractional-garbage and non-numeric input all degrade to 0.
pub fn coerce_count(raw: &str) -> usize {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return usize::try_from(n).unwrap_or(0);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f > 0.0 => f.trunc() as usize,
        _ => 0,
    }
}
