//! Pagination types
//!
//! Defines the request/response shapes shared by the page iterator and the
//! request executors.

use super::cursor::{extract_count, extract_cursor, take_at};
use crate::error::{Error, Result};
use crate::types::{JsonValue, StringMap};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ============================================================================
// Page Request
// ============================================================================

/// Parameters for one invocation of a list operation.
///
/// The caller builds the base request (filters, page-size hint, path
/// parameters). The `cursor` is owned by the page iterator and must be left
/// unset on the base request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Values for `{name}` placeholders in the operation path
    #[serde(default)]
    pub path_params: StringMap,
    /// Query filters sent on every page
    #[serde(default)]
    pub filters: StringMap,
    /// Page-size hint
    #[serde(default)]
    pub limit: Option<u32>,
    /// Continuation cursor from the previous page
    #[serde(default)]
    pub cursor: Option<String>,
}

impl PageRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path parameter
    #[must_use]
    pub fn path_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(key.into(), value.into());
        self
    }

    /// Add a query filter
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Set the page-size hint
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Copy of this request carrying the given cursor
    pub(crate) fn with_cursor(&self, cursor: Option<&str>) -> Self {
        Self {
            cursor: cursor.map(ToString::to_string),
            ..self.clone()
        }
    }

    /// Query string pairs for this request under the given layout
    pub fn query_pairs(&self, layout: &PageLayout) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(limit) = self.limit {
            pairs.push((layout.limit_param.clone(), limit.to_string()));
        }
        if let Some(cursor) = &self.cursor {
            pairs.push((layout.cursor_param.clone(), cursor.clone()));
        }
        pairs
    }
}

// ============================================================================
// Page Layout
// ============================================================================

/// Where a list operation puts its items, cursor and metadata.
///
/// Paths are dotted (`pagination.next`), a leading `$.` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Path to the array of items
    pub items_path: String,
    /// Path to the continuation cursor (string, or object with `href`)
    pub cursor_path: String,
    /// Query parameter the cursor is sent back in
    pub cursor_param: String,
    /// Query parameter the page-size hint is sent in
    pub limit_param: String,
    /// Path to the total count, if the server reports one
    pub total_count_path: Option<String>,
    /// Path to the echoed page size, if the server reports one
    pub limit_path: Option<String>,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            items_path: "items".to_string(),
            cursor_path: "next".to_string(),
            cursor_param: "start".to_string(),
            limit_param: "limit".to_string(),
            total_count_path: Some("total_count".to_string()),
            limit_path: Some("limit".to_string()),
        }
    }
}

impl PageLayout {
    /// Layout with a custom items path and default everything else
    pub fn items(path: impl Into<String>) -> Self {
        Self {
            items_path: path.into(),
            ..Self::default()
        }
    }

    /// Set the cursor path
    #[must_use]
    pub fn with_cursor_path(mut self, path: impl Into<String>) -> Self {
        self.cursor_path = path.into();
        self
    }

    /// Set the cursor query parameter
    #[must_use]
    pub fn with_cursor_param(mut self, param: impl Into<String>) -> Self {
        self.cursor_param = param.into();
        self
    }
}

// ============================================================================
// Page Response
// ============================================================================

/// Informational page metadata. Never used to decide termination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Total number of records the server reports
    pub total_count: Option<u64>,
    /// Page size the server reports
    pub limit: Option<u64>,
}

/// One parsed page of a list operation
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse<T> {
    /// Records in server order
    pub items: Vec<T>,
    /// Cursor for the next page; `None` when the listing is complete
    pub next_cursor: Option<String>,
    /// Informational metadata
    pub meta: PageMeta,
}

impl<T: DeserializeOwned> PageResponse<T> {
    /// Parse a response body according to `layout`.
    ///
    /// A missing items field is an empty page. A present items field that is
    /// not an array is a decode error.
    pub fn from_body(mut body: JsonValue, layout: &PageLayout) -> Result<Self> {
        let next_cursor = extract_cursor(&body, &layout.cursor_path);
        let meta = PageMeta {
            total_count: layout
                .total_count_path
                .as_deref()
                .and_then(|path| extract_count(&body, path)),
            limit: layout
                .limit_path
                .as_deref()
                .and_then(|path| extract_count(&body, path)),
        };

        let items = match take_at(&mut body, &layout.items_path) {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Array(values)) => values
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<T>, _>>()?,
            Some(other) => {
                return Err(Error::decode(format!(
                    "expected an array at '{}', found {}",
                    layout.items_path,
                    json_kind(&other)
                )))
            }
        };

        Ok(Self {
            items,
            next_cursor,
            meta,
        })
    }
}

impl<T> PageResponse<T> {
    /// Whether the server signalled more pages
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

// ============================================================================
// Iterator State
// ============================================================================

/// Mutable bookkeeping of a page iterator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IteratorState {
    /// Cursor to send with the next request
    pub cursor: Option<String>,
    /// Set once a page arrives without a cursor
    pub exhausted: bool,
}

impl IteratorState {
    /// Fresh state: no cursor, not exhausted
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the cursor of a successfully fetched page
    pub fn advance(&mut self, next_cursor: Option<String>) {
        match next_cursor {
            Some(cursor) => self.cursor = Some(cursor),
            None => {
                self.cursor = None;
                self.exhausted = true;
            }
        }
    }
}
