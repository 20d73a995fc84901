//! List operation definitions
//!
//! A [`ListOperation`] names one list endpoint: its method, its path template
//! and the layout of its pages.

use crate::error::{Error, Result};
use crate::pagination::{PageLayout, PageRequest};
use crate::types::{Method, StringMap};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

/// Regex for path placeholders: {engine_id}
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("placeholder regex is valid")
});

/// One list endpoint of the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOperation {
    /// Operation name (e.g. "list_ingestion_jobs")
    pub name: String,

    /// HTTP method
    #[serde(default)]
    pub method: Method,

    /// Path relative to the service URL, with `{name}` placeholders
    pub path: String,

    /// Response layout
    #[serde(default)]
    pub page: PageLayout,

    /// Filters that must be present on every request
    #[serde(default)]
    pub required_params: Vec<String>,

    /// Short description for listings
    #[serde(default)]
    pub description: Option<String>,
}

impl ListOperation {
    /// Create an operation with default method and layout
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: Method::GET,
            path: path.into(),
            page: PageLayout::default(),
            required_params: Vec::new(),
            description: None,
        }
    }

    /// Set the page layout
    #[must_use]
    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.page = layout;
        self
    }

    /// Add a required filter
    #[must_use]
    pub fn require(mut self, param: impl Into<String>) -> Self {
        self.required_params.push(param.into());
        self
    }

    /// Names of the placeholders in the path template
    pub fn path_placeholders(&self) -> BTreeSet<&str> {
        PLACEHOLDER_REGEX
            .captures_iter(&self.path)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Check a request carries a non-empty value for every placeholder and
    /// every required filter
    pub fn validate(&self, request: &PageRequest) -> Result<()> {
        let missing_path: Vec<&str> = self
            .path_placeholders()
            .into_iter()
            .filter(|name| {
                request
                    .path_params
                    .get(*name)
                    .map_or(true, |value| value.is_empty())
            })
            .collect();
        if !missing_path.is_empty() {
            return Err(Error::invalid_argument(format!(
                "'{}' requires path parameter(s): {}",
                self.name,
                missing_path.join(", ")
            )));
        }

        let missing_filters: Vec<&str> = self
            .required_params
            .iter()
            .map(String::as_str)
            .filter(|name| !request.filters.contains_key(*name))
            .collect();
        if !missing_filters.is_empty() {
            return Err(Error::invalid_argument(format!(
                "'{}' requires parameter(s): {}",
                self.name,
                missing_filters.join(", ")
            )));
        }

        Ok(())
    }

    /// Build the full URL for this operation under `service_url`.
    ///
    /// Placeholder values are percent-encoded as single path segments.
    pub fn url(&self, service_url: &Url, path_params: &StringMap) -> Result<Url> {
        let mut url = service_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::invalid_value("service_url", "URL cannot be used as a base")
            })?;
            segments.pop_if_empty();
            for segment in self.path.split('/').filter(|s| !s.is_empty()) {
                segments.push(&render_segment(segment, path_params, &self.name)?);
            }
        }
        Ok(url)
    }
}

/// Substitute placeholders inside one path segment
fn render_segment(segment: &str, params: &StringMap, operation: &str) -> Result<String> {
    let mut rendered = String::with_capacity(segment.len());
    let mut last = 0;
    for cap in PLACEHOLDER_REGEX.captures_iter(segment) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let value = params.get(name.as_str()).filter(|v| !v.is_empty()).ok_or_else(|| {
            Error::invalid_argument(format!(
                "'{operation}' requires path parameter(s): {}",
                name.as_str()
            ))
        })?;
        rendered.push_str(&segment[last..whole.start()]);
        rendered.push_str(value);
        last = whole.end();
    }
    rendered.push_str(&segment[last..]);
    Ok(rendered)
}
