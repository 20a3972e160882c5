//! Domain errors shared by every ticket type
//!
//! One variant per error kind. Storage adapters only ever produce `NotFound`,
//! `Conflict` and `Internal`; the service adds `Validation` and `IllegalTransition`
//! for the checks it performs itself. The HTTP layer maps each kind to a status code.

use thiserror::Error;

/// Errors that can occur in ticket operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or missing input
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested action is not allowed in the current state
    #[error("Action '{action}' is not allowed in state '{state}'")]
    IllegalTransition { action: String, state: String },

    /// No resolvable actor
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Tenant mismatch or missing permission
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The resource does not exist within the tenant
    #[error("{0} not found")]
    NotFound(String),

    /// A unique field already exists within the tenant
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Identifier generation, clock or storage failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error with a message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an illegal transition error
    pub fn illegal_transition(action: impl ToString, state: impl ToString) -> Self {
        Self::IllegalTransition {
            action: action.to_string(),
            state: state.to_string(),
        }
    }

    /// Create a not found error for the named resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Create a conflict error with a message
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error is of the validation kind (HTTP 400)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::IllegalTransition { .. })
    }
}

/// Result type alias for domain operations
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_transition_is_validation_kind() {
        let err = DomainError::illegal_transition("start_working", "cancelled");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Action 'start_working' is not allowed in state 'cancelled'"
        );
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("incident");
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "incident not found");
    }

    #[test]
    fn test_internal_error() {
        let err = DomainError::internal("clock unavailable");
        assert!(matches!(err, DomainError::Internal(_)));
        assert!(err.to_string().contains("clock unavailable"));
    }
}
