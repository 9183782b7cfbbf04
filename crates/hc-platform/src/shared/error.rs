//! Platform Error Types
//!
//! Every failure leaves the API as
//! `{"success": false, "errors": [{"type": "...", "message": "..."}]}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

use crate::shared::api_common::{ErrorEnvelope, ErrorItem};
use crate::usecase::UseCaseError;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    AlreadyExists { message: String },

    #[error("{message}")]
    NotModified { message: String },

    #[error("{operation} is not implemented")]
    NotImplemented { operation: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Authorization header must use the Bearer scheme")]
    MalformedToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    #[error("Identity provider unavailable: {message}")]
    IdentityUnavailable { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlatformError {
    pub fn not_found(entity_type: &str, id: &str) -> Self {
        Self::NotFound {
            message: format!("{} '{}' not found", entity_type, id),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::NotImplemented { operation: operation.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Status code and envelope `type` for this error
    pub fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "EntityNotFound"),
            Self::AlreadyExists { .. } => (StatusCode::CONFLICT, "EntityAlreadyExists"),
            Self::NotModified { .. } => (StatusCode::CONFLICT, "EntityNotModified"),
            Self::NotImplemented { .. } => (StatusCode::NOT_IMPLEMENTED, "MethodNotImplemented"),
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "ValidationError"),
            Self::MissingToken | Self::MalformedToken => {
                (StatusCode::BAD_REQUEST, "AuthenticationError")
            }
            Self::TokenExpired | Self::InvalidToken { .. } => {
                (StatusCode::UNAUTHORIZED, "AuthenticationError")
            }
            Self::IdentityUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "AuthenticationError")
            }
            Self::Database(_) | Self::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalError")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let body = ErrorEnvelope {
            success: false,
            errors: vec![ErrorItem {
                error_type: error_type.to_string(),
                message: self.to_string(),
            }],
        };

        (status, Json(body)).into_response()
    }
}

impl From<UseCaseError> for PlatformError {
    fn from(err: UseCaseError) -> Self {
        match err {
            UseCaseError::ValidationError { message, .. } => PlatformError::Validation { message },
            UseCaseError::NotFoundError { message, .. } => PlatformError::NotFound { message },
            UseCaseError::AlreadyExistsError { message, .. } => {
                PlatformError::AlreadyExists { message }
            }
            UseCaseError::BusinessRuleViolation { message, .. } => {
                PlatformError::NotModified { message }
            }
            UseCaseError::NotImplemented { message, .. } => {
                PlatformError::NotImplemented { operation: message }
            }
            UseCaseError::CommitError { message, .. } => PlatformError::Internal { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_case_error_mapping() {
        let cases = [
            (UseCaseError::validation("X", "bad"), StatusCode::BAD_REQUEST, "ValidationError"),
            (UseCaseError::not_found("X", "gone"), StatusCode::NOT_FOUND, "EntityNotFound"),
            (UseCaseError::already_exists("X", "dup"), StatusCode::CONFLICT, "EntityAlreadyExists"),
            (UseCaseError::business_rule("X", "no"), StatusCode::CONFLICT, "EntityNotModified"),
            (
                UseCaseError::not_implemented("X", "Resend invitation"),
                StatusCode::NOT_IMPLEMENTED,
                "MethodNotImplemented",
            ),
            (UseCaseError::commit("boom"), StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        ];

        for (use_case_error, status, error_type) in cases {
            let err: PlatformError = use_case_error.into();
            assert_eq!(err.status_and_type(), (status, error_type));
        }
    }

    #[test]
    fn test_authentication_statuses() {
        assert_eq!(PlatformError::MissingToken.status_and_type().0, StatusCode::BAD_REQUEST);
        assert_eq!(PlatformError::MalformedToken.status_and_type().0, StatusCode::BAD_REQUEST);
        assert_eq!(PlatformError::TokenExpired.status_and_type().0, StatusCode::UNAUTHORIZED);
        assert_eq!(
            PlatformError::InvalidToken { message: "bad signature".into() }.status_and_type().0,
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = PlatformError::not_found("Circle", "C1");
        assert_eq!(err.to_string(), "Circle 'C1' not found");
    }
}
