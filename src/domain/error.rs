//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the bookmark pipeline's input contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{name} complexity must be within {min}..={max}, got {value}")]
    ParamOutOfRange {
        name: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    #[error("nothing to classify: no valid bookmarks found")]
    NothingToClassify,

    #[error("invalid rule table: {0}")]
    InvalidRuleTable(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
