//! Use Case Errors
//!
//! Categorized error types for use case failures. The category decides the
//! HTTP status, the code is a stable machine-readable reason.
//!
//! ```ignore
//! use hc_platform::usecase::UseCaseError;
//! use hc_platform::details;
//!
//! UseCaseError::validation("NAME_REQUIRED", "Organization name is required");
//!
//! UseCaseError::not_found_with_details(
//!     "MEMBERSHIP_NOT_FOUND",
//!     "Partner is not a member of this circle",
//!     details! { "circleId" => circle_id, "partnerId" => partner_id },
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Macro for creating error detail maps.
#[macro_export]
macro_rules! details {
    () => {
        std::collections::HashMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = std::collections::HashMap::new();
        $(
            map.insert($key.to_string(), serde_json::json!($value));
        )+
        map
    }};
}

pub type ErrorDetails = HashMap<String, serde_json::Value>;

/// Categorized error types for use case failures.
///
/// - `ValidationError` -> 400 Bad Request
/// - `NotFoundError` -> 404 Not Found
/// - `AlreadyExistsError` -> 409 Conflict
/// - `BusinessRuleViolation` -> 409 Conflict (illegal state transition)
/// - `NotImplemented` -> 501 Not Implemented
/// - `CommitError` -> 500 Internal Server Error
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UseCaseError {
    /// Missing or malformed input.
    ValidationError {
        code: String,
        message: String,
        #[serde(default)]
        details: ErrorDetails,
    },

    /// Referenced entity, code or association has no live row.
    NotFoundError {
        code: String,
        message: String,
        #[serde(default)]
        details: ErrorDetails,
    },

    /// Duplicate create, e.g. re-registering an active user.
    AlreadyExistsError {
        code: String,
        message: String,
        #[serde(default)]
        details: ErrorDetails,
    },

    /// Entity is in a state that forbids the operation.
    BusinessRuleViolation {
        code: String,
        message: String,
        #[serde(default)]
        details: ErrorDetails,
    },

    /// Operation exists in the API surface but is not supported.
    NotImplemented {
        code: String,
        message: String,
        #[serde(default)]
        details: ErrorDetails,
    },

    /// Transaction commit failed.
    CommitError {
        code: String,
        message: String,
        #[serde(default)]
        details: ErrorDetails,
    },
}

impl UseCaseError {
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFoundError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn not_found_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: ErrorDetails,
    ) -> Self {
        Self::NotFoundError {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn already_exists(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AlreadyExistsError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn business_rule(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BusinessRuleViolation {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn business_rule_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: ErrorDetails,
    ) -> Self {
        Self::BusinessRuleViolation {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn not_implemented(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotImplemented {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn commit(message: impl Into<String>) -> Self {
        Self::CommitError {
            code: "COMMIT_FAILED".to_string(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::ValidationError { code, .. }
            | Self::NotFoundError { code, .. }
            | Self::AlreadyExistsError { code, .. }
            | Self::BusinessRuleViolation { code, .. }
            | Self::NotImplemented { code, .. }
            | Self::CommitError { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::ValidationError { message, .. }
            | Self::NotFoundError { message, .. }
            | Self::AlreadyExistsError { message, .. }
            | Self::BusinessRuleViolation { message, .. }
            | Self::NotImplemented { message, .. }
            | Self::CommitError { message, .. } => message,
        }
    }

    pub fn details(&self) -> &ErrorDetails {
        match self {
            Self::ValidationError { details, .. }
            | Self::NotFoundError { details, .. }
            | Self::AlreadyExistsError { details, .. }
            | Self::BusinessRuleViolation { details, .. }
            | Self::NotImplemented { details, .. }
            | Self::CommitError { details, .. } => details,
        }
    }

    /// Suggested HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::ValidationError { .. } => 400,
            Self::NotFoundError { .. } => 404,
            Self::AlreadyExistsError { .. } => 409,
            Self::BusinessRuleViolation { .. } => 409,
            Self::NotImplemented { .. } => 501,
            Self::CommitError { .. } => 500,
        }
    }
}

impl std::fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for UseCaseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(UseCaseError::validation("X", "x").http_status_code(), 400);
        assert_eq!(UseCaseError::not_found("X", "x").http_status_code(), 404);
        assert_eq!(UseCaseError::already_exists("X", "x").http_status_code(), 409);
        assert_eq!(UseCaseError::business_rule("X", "x").http_status_code(), 409);
        assert_eq!(UseCaseError::not_implemented("X", "x").http_status_code(), 501);
        assert_eq!(UseCaseError::commit("x").http_status_code(), 500);
    }

    #[test]
    fn test_display_includes_code() {
        let err = UseCaseError::validation("NAME_REQUIRED", "Name is required");
        assert_eq!(err.to_string(), "[NAME_REQUIRED] Name is required");
    }

    #[test]
    fn test_details_macro() {
        let empty: ErrorDetails = details!();
        assert!(empty.is_empty());

        let err = UseCaseError::not_found_with_details(
            "MEMBERSHIP_NOT_FOUND",
            "Partner is not a member of this circle",
            details! { "circleId" => "C1", "partnerId" => "P1" },
        );
        assert_eq!(err.details().get("circleId"), Some(&serde_json::json!("C1")));
        assert_eq!(err.details().get("partnerId"), Some(&serde_json::json!("P1")));
    }

    #[test]
    fn test_serialized_category_tag() {
        let err = UseCaseError::business_rule("INVITATION_CANCELLED", "Invitation was cancelled");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "BusinessRuleViolation");
        assert_eq!(json["code"], "INVITATION_CANCELLED");
    }
}
