//! OIDC Identity Resolver
//!
//! Verifies RS256 ID tokens issued by an external OIDC provider. The
//! provider's discovery document and JWKS are fetched lazily and cached;
//! an unknown `kid` forces one refresh to follow key rotation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::resolver::{ExternalIdentity, IdentityError, IdentityResolver};

/// The parts of the discovery document this resolver reads
#[derive(Debug, Clone, Deserialize)]
pub struct OidcDiscovery {
    pub issuer: String,
    pub jwks_uri: String,
}

/// JWKS (JSON Web Key Set)
#[derive(Debug, Clone, Deserialize)]
pub struct Jwks {
    pub keys: Vec<JwkKey>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwkKey {
    pub kty: String,
    pub kid: Option<String>,
    pub n: Option<String>,
    pub e: Option<String>,
}

/// ID token claims mapped onto an identity
#[derive(Debug, Clone, Deserialize)]
struct IdTokenClaims {
    sub: String,
    email: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
}

struct CachedProvider {
    discovery: OidcDiscovery,
    jwks: Jwks,
    fetched_at: DateTime<Utc>,
}

pub struct OidcIdentityResolver {
    http_client: reqwest::Client,
    issuer_url: String,
    audience: String,
    jwks_cache_ttl_secs: u64,
    cache: RwLock<Option<CachedProvider>>,
}

impl OidcIdentityResolver {
    pub fn new(issuer_url: &str, audience: &str, jwks_cache_ttl_secs: u64) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            issuer_url: issuer_url.trim_end_matches('/').to_string(),
            audience: audience.to_string(),
            jwks_cache_ttl_secs,
            cache: RwLock::new(None),
        }
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, IdentityError> {
        self.http_client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| IdentityError::Unavailable(format!("GET {} failed: {}", url, e)))?
            .json()
            .await
            .map_err(|e| IdentityError::Unavailable(format!("Invalid response from {}: {}", url, e)))
    }

    async fn fetch_provider(&self) -> Result<CachedProvider, IdentityError> {
        let discovery_url = format!("{}/.well-known/openid-configuration", self.issuer_url);
        info!("Fetching OIDC discovery document from {}", discovery_url);
        let discovery: OidcDiscovery = self.fetch_json(&discovery_url).await?;

        info!("Fetching JWKS from {}", discovery.jwks_uri);
        let jwks: Jwks = self.fetch_json(&discovery.jwks_uri).await?;

        Ok(CachedProvider {
            discovery,
            jwks,
            fetched_at: Utc::now(),
        })
    }

    fn is_stale(&self, provider: &CachedProvider) -> bool {
        let age = (Utc::now() - provider.fetched_at).num_seconds().max(0) as u64;
        age > self.jwks_cache_ttl_secs
    }

    /// Verify against the cached keys; `Ok(None)` when no key matches the `kid`.
    async fn verify_cached(
        &self,
        token: &str,
        kid: Option<&str>,
        force_refresh: bool,
    ) -> Result<Option<ExternalIdentity>, IdentityError> {
        {
            let cache = self.cache.read().await;
            if let Some(provider) = cache.as_ref() {
                if !force_refresh && !self.is_stale(provider) {
                    return self.verify_with(provider, token, kid);
                }
            }
        }

        let provider = self.fetch_provider().await?;
        let result = self.verify_with(&provider, token, kid);
        *self.cache.write().await = Some(provider);
        result
    }

    fn verify_with(
        &self,
        provider: &CachedProvider,
        token: &str,
        kid: Option<&str>,
    ) -> Result<Option<ExternalIdentity>, IdentityError> {
        let Some(key) = provider
            .jwks
            .keys
            .iter()
            .find(|k| kid.map_or(true, |kid| k.kid.as_deref() == Some(kid)))
        else {
            return Ok(None);
        };

        let decoding_key = match key.kty.as_str() {
            "RSA" => {
                let n = key.n.as_deref().ok_or_else(|| IdentityError::Invalid("Missing 'n' in RSA key".to_string()))?;
                let e = key.e.as_deref().ok_or_else(|| IdentityError::Invalid("Missing 'e' in RSA key".to_string()))?;
                DecodingKey::from_rsa_components(n, e)
                    .map_err(|e| IdentityError::Invalid(format!("Invalid RSA key: {}", e)))?
            }
            other => {
                return Err(IdentityError::Invalid(format!("Unsupported key type: {}", other)));
            }
        };

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&provider.discovery.issuer]);
        validation.set_audience(&[&self.audience]);

        let claims = decode::<IdTokenClaims>(token, &decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => IdentityError::Expired,
                _ => IdentityError::Invalid(e.to_string()),
            })?
            .claims;

        let email = claims
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| IdentityError::Invalid("token carries no email claim".to_string()))?;

        Ok(Some(ExternalIdentity {
            external_id: claims.sub,
            first_name: claims.given_name,
            last_name: claims.family_name,
            email,
        }))
    }
}

#[async_trait]
impl IdentityResolver for OidcIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<ExternalIdentity, IdentityError> {
        let header = decode_header(token)
            .map_err(|e| IdentityError::Invalid(format!("Invalid token header: {}", e)))?;
        let kid = header.kid.as_deref();

        if let Some(identity) = self.verify_cached(token, kid, false).await? {
            return Ok(identity);
        }

        warn!(?kid, "No matching signing key, refreshing JWKS");
        self.verify_cached(token, kid, true)
            .await?
            .ok_or_else(|| IdentityError::Invalid("No matching key found in JWKS".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_token_is_invalid_without_network() {
        let resolver = OidcIdentityResolver::new("http://127.0.0.1:9", "aud", 60);
        let result = resolver.resolve("not-a-jwt").await;
        assert!(matches!(result, Err(IdentityError::Invalid(_))));
    }

    #[test]
    fn test_issuer_trailing_slash_trimmed() {
        let resolver = OidcIdentityResolver::new("https://login.example.com/", "aud", 60);
        assert_eq!(resolver.issuer_url, "https://login.example.com");
    }
}
