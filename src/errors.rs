//! Crate-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Top-level error: domain failures plus configuration loading.
#[derive(Error, Debug)]
pub enum TreeStoreError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },
}

pub type TreeStoreResult<T> = Result<T, TreeStoreError>;
