//! Identity Resolver contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A caller as asserted by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIdentity {
    /// Stable subject id at the provider
    pub external_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

impl ExternalIdentity {
    pub fn new(external_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            first_name: None,
            last_name: None,
            email: email.into(),
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Verifies tokens; implementations must be safe to share across requests.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<ExternalIdentity, IdentityError>;
}
