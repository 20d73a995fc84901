//! CLI module
//!
//! Command-line interface for paging through lakehouse list operations.
//!
//! # Commands
//!
//! - `operations` - List registered list operations
//! - `list` - Page through an operation and print every item

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
