//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the topology model.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("invalid firmware version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
