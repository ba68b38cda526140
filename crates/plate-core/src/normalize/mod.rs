//! Legacy document normalization.
//!
//! Every entity type has gone through several document shapes. The functions
//! here take a raw JSON document in any historical shape and return the one
//! canonical entity. They are pure and total: missing or mistyped fields fall
//! back to empty values, never to an error, and applying a normalizer to the
//! serialized output of the same normalizer is a no-op.
//!
//! Each entity type has one `is_canonical_*` predicate: a document is
//! canonical when its designated canonical field (`tags`, `groups`,
//! `selections`, `completions`) is a non-empty collection. Anything else is
//! upgraded from whatever legacy fields are present.
//!
//! Live callers that receive payloads from old browser caches run them
//! through these functions before writing.

mod food;
mod meal;
mod menu;
mod profile;
mod selection;
mod shared_menu;

pub use food::{is_canonical_food, normalize_food};
pub use meal::{
    has_unrecoverable_main_completion, is_canonical_review, normalize_meal,
    normalize_meal_selection, normalize_review,
};
pub use menu::{is_canonical_menu, normalize_menu};
pub use profile::normalize_profile;
pub use selection::{is_canonical_kid_selection, normalize_kid_selection, normalize_selection_map};
pub use shared_menu::{normalize_shared_menu, normalize_shared_menu_response};

use chrono::DateTime;
use serde_json::Value;

/// True when `doc[field]` is an array with at least one element.
fn non_empty_array(doc: &Value, field: &str) -> bool {
    doc.get(field)
        .and_then(Value::as_array)
        .is_some_and(|a| !a.is_empty())
}

/// True when `doc[field]` is an object with at least one key.
fn non_empty_object(doc: &Value, field: &str) -> bool {
    doc.get(field)
        .and_then(Value::as_object)
        .is_some_and(|o| !o.is_empty())
}

/// True when `doc[field]` exists and is not `null`.
fn present(doc: &Value, field: &str) -> bool {
    doc.get(field).is_some_and(|v| !v.is_null())
}

/// Read an ID-like scalar. Old documents used numeric IDs.
fn id_value(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_field(doc: &Value, field: &str) -> Option<String> {
    doc.get(field).and_then(id_value)
}

fn string_field(doc: &Value, field: &str) -> String {
    doc.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn opt_string_field(doc: &Value, field: &str) -> Option<String> {
    doc.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Read a list of IDs, skipping entries that are not ID-like. A bare scalar
/// is treated as a one-element list.
fn id_list(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items.iter().filter_map(id_value).collect(),
        Some(other) => id_value(other).into_iter().collect(),
        None => Vec::new(),
    }
}

fn string_list(v: Option<&Value>) -> Vec<String> {
    v.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn int_field(doc: &Value, field: &str) -> Option<i64> {
    match doc.get(field)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bool_field(doc: &Value, field: &str) -> Option<bool> {
    match doc.get(field)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    }
}

/// Read a timestamp as epoch milliseconds.
///
/// Accepts numbers (already milliseconds), numeric strings, and RFC 3339
/// strings.
fn timestamp_field(doc: &Value, field: &str) -> Option<i64> {
    match doc.get(field)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok().or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.timestamp_millis())
        }),
        _ => None,
    }
}
