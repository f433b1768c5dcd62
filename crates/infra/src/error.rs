use thiserror::Error;

use medimart_auth::AuthzError;
use medimart_core::DomainError;

/// Failure of an application-store operation.
///
/// Nothing is committed or published when an operation returns an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Forbidden(#[from] AuthzError),

    #[error("unauthorized")]
    Unauthorized,
}

impl From<DomainError> for StoreError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => StoreError::Validation(msg),
            DomainError::InvariantViolation(msg) => StoreError::InvariantViolation(msg),
            DomainError::InvalidId(msg) => StoreError::Validation(msg),
            DomainError::NotFound(_) => StoreError::NotFound,
            DomainError::Conflict(msg) => StoreError::Conflict(msg),
            DomainError::Unauthorized => StoreError::Unauthorized,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
