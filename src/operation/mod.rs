//! List operations
//!
//! Describes the list endpoints the SDK can page through. Each
//! [`ListOperation`] carries its path template and page layout; the
//! [`OperationRegistry`] holds the built-ins plus any user definitions.

mod definition;
mod registry;

pub use definition::ListOperation;
pub use registry::OperationRegistry;
