//! API Middleware
//!
//! Bearer token authentication for Axum. The layer places the identity
//! resolver into request extensions; the `Authenticated` extractor resolves
//! the token and turns failures into the platform error envelope.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::Response,
};
use tower::{Layer, Service};
use tracing::debug;

use crate::identity::{ExternalIdentity, IdentityError, IdentityResolver};
use crate::shared::error::PlatformError;
use crate::usecase::ExecutionContext;

/// Header carrying a caller supplied correlation id
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Shared authentication state
#[derive(Clone)]
pub struct AuthState {
    pub resolver: Arc<dyn IdentityResolver>,
}

impl AuthState {
    pub fn new(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { resolver }
    }
}

/// Extract the token from `Bearer <token>`; the scheme is case-insensitive.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Authenticated caller extractor
pub struct Authenticated {
    pub identity: ExternalIdentity,
    pub correlation_id: Option<String>,
}

impl Authenticated {
    /// Execution context with the caller as principal
    pub fn context(&self) -> ExecutionContext {
        match &self.correlation_id {
            Some(correlation_id) => {
                ExecutionContext::with_correlation(&self.identity.external_id, correlation_id)
            }
            None => ExecutionContext::create(&self.identity.external_id),
        }
    }

    pub fn external_id(&self) -> &str {
        &self.identity.external_id
    }
}

impl From<IdentityError> for PlatformError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Expired => PlatformError::TokenExpired,
            IdentityError::Invalid(message) => PlatformError::InvalidToken { message },
            IdentityError::Unavailable(message) => PlatformError::IdentityUnavailable { message },
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = PlatformError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = parts
            .extensions
            .get::<AuthState>()
            .cloned()
            .ok_or_else(|| PlatformError::internal("Authentication is not configured"))?;

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(PlatformError::MissingToken)?
            .to_str()
            .map_err(|_| PlatformError::MalformedToken)?;

        let token = extract_bearer_token(header).ok_or(PlatformError::MalformedToken)?;

        let identity = auth_state.resolver.resolve(token).await?;
        debug!(external_id = %identity.external_id, "Authenticated request");

        let correlation_id = parts
            .headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from);

        Ok(Authenticated {
            identity,
            correlation_id,
        })
    }
}

/// Middleware layer that injects AuthState into request extensions
#[derive(Clone)]
pub struct AuthLayer {
    state: AuthState,
}

impl AuthLayer {
    pub fn new(state: AuthState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    state: AuthState,
}

impl<S, B> Service<axum::http::Request<B>> for AuthMiddleware<S>
where
    S: Service<axum::http::Request<B>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(self.state.clone());

        let future = self.inner.call(req);
        Box::pin(future)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("BEARER  abc "), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer"), None);
        assert_eq!(extract_bearer_token("Bearer   "), None);
    }

    #[test]
    fn test_context_uses_correlation_header() {
        let auth = Authenticated {
            identity: ExternalIdentity::new("auth0|bob", "bob@example.com"),
            correlation_id: Some("corr-9".to_string()),
        };
        let ctx = auth.context();
        assert_eq!(ctx.principal_id, "auth0|bob");
        assert_eq!(ctx.correlation_id, "corr-9");
    }

    #[test]
    fn test_identity_error_mapping() {
        let expired: PlatformError = IdentityError::Expired.into();
        assert!(matches!(expired, PlatformError::TokenExpired));
        let down: PlatformError = IdentityError::Unavailable("timeout".into()).into();
        assert!(matches!(down, PlatformError::IdentityUnavailable { .. }));
    }
}
