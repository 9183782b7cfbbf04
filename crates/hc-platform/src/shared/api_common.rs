//! Common API types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Always false
    pub success: bool,
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorItem {
    /// EntityNotFound, EntityAlreadyExists, EntityNotModified,
    /// MethodNotImplemented, ValidationError, AuthenticationError, InternalError
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

/// Body for operations that return no entity (deletes)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Trim a required text field; `None` when blank
pub fn required_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_shape() {
        let body = ErrorEnvelope {
            success: false,
            errors: vec![ErrorItem {
                error_type: "EntityNotFound".to_string(),
                message: "Circle 'C1' not found".to_string(),
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"][0]["type"], "EntityNotFound");
        assert_eq!(json["errors"][0]["message"], "Circle 'C1' not found");
    }

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("  Acme "), Some("Acme".to_string()));
        assert_eq!(required_text("   "), None);
    }
}
