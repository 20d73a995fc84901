// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Lakehouse SDK
//!
//! Rust client for the lakehouse REST API, built around a generic
//! cursor-following page iterator.
//!
//! ## Features
//!
//! - **Cursor Pagination**: [`PageCursorIterator`] follows opaque server cursors
//!   until a page arrives without one
//! - **Pluggable Transport**: any [`RequestExecutor`] can back the iterator
//! - **REST Executor**: built-in list operations with path templates and
//!   per-operation page layouts
//! - **Auth**: Bearer, Basic, API key and IAM token exchange
//! - **HTTP**: retries, backoff and client-side rate limiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lakehouse_sdk::{load_config, PageCursorIterator, PageRequest};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> lakehouse_sdk::Result<()> {
//!     let executor = Arc::new(load_config("lakehouse.yaml")?.build_executor()?);
//!
//!     let request = PageRequest::new().filter("status", "running").limit(50);
//!     let mut jobs = PageCursorIterator::<serde_json::Value>::new(
//!         executor,
//!         "list_ingestion_jobs",
//!         request,
//!     )?;
//!
//!     while jobs.has_next() {
//!         for job in jobs.next_page().await? {
//!             println!("{job}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 PageCursorIterator<T>                   │
//! │     has_next()   next_page()   collect_all()   streams  │
//! └───────────────────────────┬─────────────────────────────┘
//!                             │ RequestExecutor
//! ┌───────────────┬───────────┴───────────┬─────────────────┐
//! │  Operations   │        HTTP           │      Auth       │
//! ├───────────────┼───────────────────────┼─────────────────┤
//! │ Registry      │ Retry policy          │ Bearer / Basic  │
//! │ Path template │ Rate limit            │ API key         │
//! │ Page layout   │ Backoff               │ IAM token       │
//! └───────────────┴───────────────────────┴─────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Request executors
pub mod executor;

/// List operation definitions and registry
pub mod operation;

/// SDK configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, SdkConfig};
pub use executor::{RequestExecutor, RestExecutor};
pub use operation::{ListOperation, OperationRegistry};
pub use pagination::{PageCursorIterator, PageLayout, PageMeta, PageRequest, PageResponse};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
