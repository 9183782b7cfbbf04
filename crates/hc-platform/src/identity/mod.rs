//! Identity Resolution
//!
//! Turns a bearer token into a verified external identity. Handlers never
//! see tokens; they receive the resolved identity through the
//! [`Authenticated`](crate::shared::middleware::Authenticated) extractor.

pub mod resolver;
pub mod static_resolver;
pub mod oidc;

use std::sync::Arc;

use hc_config::{IdentityConfig, IdentityMode};

pub use resolver::{ExternalIdentity, IdentityError, IdentityResolver};
pub use static_resolver::StaticIdentityResolver;
pub use oidc::OidcIdentityResolver;

/// Build the resolver selected by configuration.
pub fn resolver_from_config(config: &IdentityConfig) -> Arc<dyn IdentityResolver> {
    match config.mode {
        IdentityMode::Static => Arc::new(StaticIdentityResolver::from_fixtures(&config.static_tokens)),
        IdentityMode::Oidc => Arc::new(OidcIdentityResolver::new(
            &config.issuer_url,
            &config.audience,
            config.jwks_cache_ttl_secs,
        )),
    }
}
