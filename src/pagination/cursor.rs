//! Cursor and metadata extraction from response envelopes
//!
//! The cursor is opaque: it is read out of the envelope and handed back to
//! the server verbatim, never parsed or rebuilt.

use crate::types::{JsonValue, OptionStringExt};

/// Member holding the continuation reference when the cursor is an object
const HREF_FIELD: &str = "href";

/// Split a dotted path, accepting a leading `$.`
fn segments(path: &str) -> impl Iterator<Item = &str> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    path.split('.').filter(|part| !part.is_empty())
}

/// Get a nested value by dotted path
pub fn value_at<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut current = value;
    for part in segments(path) {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Take a nested value out of `value`, leaving `null` in its place
pub fn take_at(value: &mut JsonValue, path: &str) -> Option<JsonValue> {
    let mut current = value;
    for part in segments(path) {
        current = current.as_object_mut()?.get_mut(part)?;
    }
    Some(current.take())
}

/// Extract the next-page cursor.
///
/// A string is the cursor itself; an object carries it in `href`. Null,
/// missing and empty values all mean "no more pages".
pub fn extract_cursor(body: &JsonValue, path: &str) -> Option<String> {
    let raw = match value_at(body, path)? {
        JsonValue::String(s) => s.clone(),
        JsonValue::Object(map) => match map.get(HREF_FIELD)? {
            JsonValue::String(s) => s.clone(),
            _ => return None,
        },
        _ => return None,
    };
    raw.none_if_empty()
}

/// Extract a non-negative count (number or numeric string)
pub fn extract_count(body: &JsonValue, path: &str) -> Option<u64> {
    match value_at(body, path)? {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.parse().ok(),
        _ => None,
    }
}
