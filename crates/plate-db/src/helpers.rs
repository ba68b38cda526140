//! Row-to-entity parsing helpers.
//!
//! Entities carry epoch-millisecond timestamps while the store keeps RFC 3339
//! TEXT (or `SQLite`'s `datetime('now')` format for defaulted columns).
//! JSON-valued columns are serialized text.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a timestamp column into epoch milliseconds.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string is not a datetime.
pub fn datetime_to_millis(s: &str) -> Result<i64, DatabaseError> {
    Ok(parse_datetime(s)?.timestamp_millis())
}

/// Format epoch milliseconds for storage. Out-of-range values clamp to the epoch.
#[must_use]
pub fn millis_to_rfc3339(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Deserialize a JSON TEXT column into `T`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the text is not valid JSON for `T`.
pub fn parse_json_column<T: DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_str(s).map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))
}

/// Serialize `value` for a JSON TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn to_json_text<T: Serialize + ?Sized>(value: &T) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::Other(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use plate_core::entities::SelectionMap;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_both_datetime_formats() {
        let a = parse_datetime("2024-01-02T03:04:05+00:00").unwrap();
        let b = parse_datetime("2024-01-02 03:04:05").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parse_datetime_rejects_garbage() {
        assert!(matches!(
            parse_datetime("yesterday"),
            Err(DatabaseError::Query(_))
        ));
    }

    #[test]
    fn millis_survive_storage_format() {
        let ms = 1_704_164_645_123;
        let text = millis_to_rfc3339(ms);
        assert_eq!(text, "2024-01-02T03:04:05.123Z");
        assert_eq!(datetime_to_millis(&text).unwrap(), ms);
    }

    #[test]
    fn json_column_into_selection_map() {
        let map: SelectionMap = parse_json_column(r#"{"g1":["f1","f2"]}"#).unwrap();
        assert_eq!(map["g1"], vec!["f1", "f2"]);
        assert!(parse_json_column::<SelectionMap>("{not json").is_err());
    }
}
