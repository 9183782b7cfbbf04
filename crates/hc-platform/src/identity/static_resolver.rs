//! Static token table
//!
//! Fixture resolver for tests and `dev_mode`. Each instance owns its table;
//! there is no shared global state.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use hc_config::StaticTokenConfig;

use super::resolver::{ExternalIdentity, IdentityError, IdentityResolver};

#[derive(Debug, Default, Clone)]
pub struct StaticIdentityResolver {
    identities: HashMap<String, ExternalIdentity>,
    expired: HashSet<String>,
}

impl StaticIdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixtures(fixtures: &[StaticTokenConfig]) -> Self {
        fixtures.iter().fold(Self::new(), |resolver, fixture| {
            let identity = ExternalIdentity {
                external_id: fixture.external_id.clone(),
                first_name: fixture.first_name.clone(),
                last_name: fixture.last_name.clone(),
                email: fixture.email.clone(),
            };
            if fixture.expired {
                resolver.with_expired(&fixture.token)
            } else {
                resolver.with_identity(&fixture.token, identity)
            }
        })
    }

    pub fn with_identity(mut self, token: &str, identity: ExternalIdentity) -> Self {
        self.identities.insert(token.to_string(), identity);
        self
    }

    /// Token that resolves as expired
    pub fn with_expired(mut self, token: &str) -> Self {
        self.expired.insert(token.to_string());
        self
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<ExternalIdentity, IdentityError> {
        if self.expired.contains(token) {
            return Err(IdentityError::Expired);
        }
        self.identities
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::Invalid("unknown token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_known_token() {
        let resolver = StaticIdentityResolver::new().with_identity(
            "alice",
            ExternalIdentity::new("auth0|alice", "alice@example.com").with_name("Alice", "Liddell"),
        );

        let identity = resolver.resolve("alice").await.unwrap();
        assert_eq!(identity.external_id, "auth0|alice");
        assert_eq!(identity.first_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_unknown_and_expired_tokens() {
        let resolver = StaticIdentityResolver::new().with_expired("old");
        assert!(matches!(resolver.resolve("old").await, Err(IdentityError::Expired)));
        assert!(matches!(resolver.resolve("nope").await, Err(IdentityError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_from_fixtures() {
        let fixtures = vec![
            StaticTokenConfig {
                token: "t1".to_string(),
                external_id: "dev|1".to_string(),
                first_name: Some("Dev".to_string()),
                last_name: None,
                email: "dev@example.com".to_string(),
                expired: false,
            },
            StaticTokenConfig {
                token: "t2".to_string(),
                external_id: "dev|2".to_string(),
                first_name: None,
                last_name: None,
                email: "old@example.com".to_string(),
                expired: true,
            },
        ];

        let resolver = StaticIdentityResolver::from_fixtures(&fixtures);
        assert_eq!(resolver.resolve("t1").await.unwrap().email, "dev@example.com");
        assert!(matches!(resolver.resolve("t2").await, Err(IdentityError::Expired)));
    }
}
