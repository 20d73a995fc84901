//! Cursor-following page iterator
//!
//! [`PageCursorIterator`] drives one list operation page by page. It sends the
//! base request, reads the continuation cursor out of each response and hands
//! it back verbatim on the next call, stopping once a page arrives without a
//! cursor.
//!
//! ```text
//!   READY ──next_page() + cursor────▶ READY
//!     │
//!     └────next_page() + no cursor──▶ EXHAUSTED (terminal)
//! ```

use super::types::{IteratorState, PageLayout, PageMeta, PageRequest, PageResponse};
use crate::error::{Error, Result};
use crate::executor::RequestExecutor;
use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Pull-based iterator over the pages of a list operation.
///
/// `next_page` takes `&mut self`, so one instance can never have two fetches
/// in flight. Independent instances share nothing but the executor.
pub struct PageCursorIterator<T> {
    executor: Arc<dyn RequestExecutor>,
    operation: String,
    base: PageRequest,
    layout: PageLayout,
    state: IteratorState,
    pages_fetched: u32,
    last_meta: Option<PageMeta>,
    _item: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> PageCursorIterator<T> {
    /// Create an iterator over `operation`. Performs no I/O.
    ///
    /// Fails with [`Error::InvalidArgument`] if the operation name is empty,
    /// if `base` already carries a cursor (either in `cursor` or as a filter
    /// named like the cursor parameter), if a filter is named like the
    /// page-size parameter, or if the executor rejects the operation or its
    /// parameters.
    pub fn new(
        executor: Arc<dyn RequestExecutor>,
        operation: impl Into<String>,
        base: PageRequest,
    ) -> Result<Self> {
        let operation = operation.into();
        if operation.trim().is_empty() {
            return Err(Error::invalid_argument("operation name must not be empty"));
        }

        let layout = executor.page_layout(&operation)?;

        if let Some(cursor) = &base.cursor {
            return Err(Error::invalid_argument(format!(
                "base parameters for '{operation}' already carry cursor '{cursor}'; \
                 the cursor is taken from responses only"
            )));
        }
        if base.filters.contains_key(&layout.cursor_param) {
            return Err(Error::invalid_argument(format!(
                "filter '{}' for '{operation}' collides with the cursor parameter",
                layout.cursor_param
            )));
        }
        if base.filters.contains_key(&layout.limit_param) {
            return Err(Error::invalid_argument(format!(
                "filter '{}' for '{operation}' collides with the page-size parameter; \
                 use PageRequest::limit instead",
                layout.limit_param
            )));
        }

        executor.validate_params(&operation, &base)?;

        Ok(Self {
            executor,
            operation,
            base,
            layout,
            state: IteratorState::new(),
            pages_fetched: 0,
            last_meta: None,
            _item: PhantomData,
        })
    }

    /// Whether another page may be fetched. Always true before the first fetch.
    pub fn has_next(&self) -> bool {
        !self.state.exhausted
    }

    /// Fetch the next page.
    ///
    /// An empty page is a normal result and does not by itself end the
    /// listing. On any error the iterator is left exactly as it was, so the
    /// call can be retried.
    pub async fn next_page(&mut self) -> Result<Vec<T>> {
        if self.state.exhausted {
            return Err(Error::exhausted(&self.operation));
        }

        let request = self.base.with_cursor(self.state.cursor.as_deref());
        let body = self.executor.execute(&self.operation, &request).await?;
        let page = PageResponse::<T>::from_body(body, &self.layout)?;

        self.pages_fetched += 1;
        self.last_meta = Some(page.meta);
        debug!(
            operation = %self.operation,
            page = self.pages_fetched,
            items = page.items.len(),
            has_more = page.has_more(),
            "fetched page"
        );
        self.state.advance(page.next_cursor);

        Ok(page.items)
    }

    /// Fetch every remaining page and concatenate the items in fetch order.
    ///
    /// Returns the first error encountered; items fetched before it are
    /// dropped. Use [`next_page`](Self::next_page) directly to keep partial
    /// results.
    pub async fn collect_all(&mut self) -> Result<Vec<T>> {
        let mut all = Vec::new();
        while self.has_next() {
            let mut page = self.next_page().await?;
            all.append(&mut page);
        }
        Ok(all)
    }

    /// Stream of pages. Ends after the last page or the first error.
    pub fn into_pages(self) -> impl Stream<Item = Result<Vec<T>>> {
        stream::try_unfold(self, |mut pager| async move {
            if !pager.has_next() {
                return Ok(None);
            }
            let page = pager.next_page().await?;
            Ok::<_, Error>(Some((page, pager)))
        })
    }

    /// Stream of individual items across all pages
    pub fn into_items(self) -> impl Stream<Item = Result<T>> {
        self.into_pages()
            .map_ok(|page| stream::iter(page.into_iter().map(Ok::<T, Error>)))
            .try_flatten()
    }
}

impl<T> PageCursorIterator<T> {
    /// Operation this iterator drives
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Base request as supplied by the caller
    pub fn base_request(&self) -> &PageRequest {
        &self.base
    }

    /// Current cursor bookkeeping
    pub fn state(&self) -> &IteratorState {
        &self.state
    }

    /// Number of pages fetched successfully
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Metadata of the last successful page
    pub fn last_page_meta(&self) -> Option<PageMeta> {
        self.last_meta
    }
}

impl<T> std::fmt::Debug for PageCursorIterator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCursorIterator")
            .field("operation", &self.operation)
            .field("base", &self.base)
            .field("state", &self.state)
            .field("pages_fetched", &self.pages_fetched)
            .finish_non_exhaustive()
    }
}
