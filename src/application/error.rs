//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add snapshot-loading context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid {document} document: {message}")]
    InvalidDocument {
        document: &'static str,
        message: String,
    },

    #[error("node record #{index}: missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("link #{link}: node index {index} out of range ({node_count} nodes)")]
    DanglingLinkIndex {
        link: usize,
        index: usize,
        node_count: usize,
    },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
