//! Request executors
//!
//! A [`RequestExecutor`] turns an operation name plus a [`PageRequest`] into a
//! parsed JSON response body. Authentication, retries and transport all live
//! behind this trait; the page iterator only sees the body or the error.
//!
//! [`RestExecutor`] is the HTTP implementation backed by
//! [`HttpClient`](crate::http::HttpClient) and an
//! [`OperationRegistry`](crate::operation::OperationRegistry).

mod rest;

pub use rest::RestExecutor;

use crate::error::Result;
use crate::pagination::{PageLayout, PageRequest};
use crate::types::JsonValue;
use async_trait::async_trait;

/// Executes named list operations
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Perform one call and return the parsed response body
    async fn execute(&self, operation: &str, request: &PageRequest) -> Result<JsonValue>;

    /// Response layout of `operation`
    fn page_layout(&self, _operation: &str) -> Result<PageLayout> {
        Ok(PageLayout::default())
    }

    /// Check `request` carries everything `operation` needs
    fn validate_params(&self, _operation: &str, _request: &PageRequest) -> Result<()> {
        Ok(())
    }
}

