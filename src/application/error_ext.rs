//! Error conversion helpers for snapshot retrieval
//!
//! Provides extension traits for cleaner error handling with source context.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add snapshot source context (path or URL) to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// self.fs.read_to_string(path)
    ///     .with_source_context("read nodes document", source)?;
    /// ```
    fn with_source_context(self, action: &str, source: &str) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_source_context(self, action: &str, source: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, source),
            source: Box::new(e),
        })
    }
}
