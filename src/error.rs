use thiserror::Error;

use crate::gateway::StorageError;
use crate::storage::DatabaseError;

/// Errors returned by the service layer.
///
/// Validation and authorization failures are raised before any write or
/// storage call. Storage and persistence failures pass through unchanged.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The requester does not own the resource.
    #[error("unauthorized action")]
    Unauthorized,
    #[error("forbidden action")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The resource is in a state that does not allow the operation.
    #[error("{0}")]
    InvalidStatus(String),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid file type '{0}'. Only images are allowed")]
    InvalidFileType(String),
    #[error("file too large ({size} bytes). Max {max} bytes")]
    FileTooLarge { size: usize, max: usize },
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
    #[error("persistence failure: {0}")]
    Persistence(#[from] DatabaseError),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
