//! HTTP error envelope
//!
//! Maps each domain error kind to its status code and renders `{"error": "..."}`.
//! Internal failures are logged in full but reach the client as a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use itsm_domain::DomainError;
use tracing::error;

use crate::dto::incidents::ErrorResponse;

const INTERNAL_MESSAGE: &str = "internal server error";

/// Errors returned by HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    /// The service call did not finish before the request deadline
    Timeout,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::Domain(DomainError::validation(msg))
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Domain(err) => match err {
                DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                DomainError::IllegalTransition { .. } => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                DomainError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
                DomainError::Unauthorized(msg) => (StatusCode::FORBIDDEN, msg.clone()),
                DomainError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                DomainError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                DomainError::Internal(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
                }
            },
            ApiError::Timeout => (
                StatusCode::SERVICE_UNAVAILABLE,
                "request timed out".to_string(),
            ),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Domain(err @ DomainError::Internal(_)) = &self {
            error!(error = %err, "Internal error while handling request");
        }

        let (status, message) = self.status_and_message();
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: DomainError) -> StatusCode {
        ApiError::from(err).status_and_message().0
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(DomainError::validation("x")), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(DomainError::illegal_transition("cancel", "cancelled")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::Unauthenticated("x".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(DomainError::Unauthorized("x".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_of(DomainError::not_found("incident")), StatusCode::NOT_FOUND);
        assert_eq!(status_of(DomainError::conflict("x")), StatusCode::CONFLICT);
        assert_eq!(
            status_of(DomainError::internal("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_not_leaked() {
        let (_, message) = ApiError::from(DomainError::internal("store lock poisoned at 0x7f"))
            .status_and_message();
        assert_eq!(message, INTERNAL_MESSAGE);
    }
}
