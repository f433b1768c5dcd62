//! Errors raised by domain rules.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Why a command or lookup was refused.
///
/// A refused command has not changed any state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Bad input: blank address, zero price, a delivery date that is too early.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The aggregate is in the wrong state, e.g. accepting a delivered order.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Names the kind of thing that was looked up ("order", "ticket").
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Creating something that already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The acting role lacks the permission.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(what: &'static str) -> Self {
        Self::NotFound(what)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_missing_thing() {
        assert_eq!(DomainError::not_found("order").to_string(), "order not found");
        assert_eq!(
            DomainError::validation("address is required").to_string(),
            "validation failed: address is required"
        );
    }
}
