//! Pagination module
//!
//! Generic cursor pagination for list operations.
//!
//! # Overview
//!
//! Every list endpoint of the API returns a page of items plus an optional
//! continuation cursor. [`PageCursorIterator`] hides that bookkeeping: it
//! threads each cursor into the next request and stops once a page arrives
//! without one. Where the items and cursor live in a response body is
//! described by a [`PageLayout`].

mod cursor;
mod pager;
mod types;

pub use cursor::{extract_count, extract_cursor, value_at};
pub use pager::PageCursorIterator;
pub use types::{IteratorState, PageLayout, PageMeta, PageRequest, PageResponse};
