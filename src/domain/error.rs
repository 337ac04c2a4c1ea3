//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::record::RecordId;

/// Domain errors represent structural problems in the record set.
/// Missing ids and dangling parents are not errors; queries answer them
/// with an empty result.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("record {index} is not an object")]
    NotAnObject { index: usize },

    #[error("record {index} is missing required field `{field}`")]
    MissingField { field: &'static str, index: usize },

    #[error("record {index} has an invalid id: {reason}")]
    InvalidId { index: usize, reason: String },

    #[error("record {index} has an invalid parent: {reason}")]
    InvalidParent { index: usize, reason: String },

    #[error("duplicate record id: {0}")]
    DuplicateId(RecordId),

    #[error("multiple root records: {first} and {second}")]
    MultipleRoots { first: RecordId, second: RecordId },

    #[error("cycle detected in parent chain at: {0}")]
    CycleDetected(RecordId),

    #[error("invalid record json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
