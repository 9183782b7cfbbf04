//! OIDC identity resolution against a mock provider.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hc_config::HttpConfig;
use hc_platform::identity::{IdentityError, IdentityResolver, OidcIdentityResolver};
use hc_platform::shared::database;

const SIGNING_KEY: &str = include_str!("fixtures/oidc_test_key.pem");
const JWKS: &str = include_str!("fixtures/oidc_test_jwks.json");
const AUDIENCE: &str = "holacracy-test";

async fn provider(discovery_calls: u64) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issuer": server.uri(),
            "jwks_uri": format!("{}/jwks", server.uri()),
        })))
        .expect(discovery_calls)
        .mount(&server)
        .await;

    let jwks: Value = serde_json::from_str(JWKS).unwrap();
    Mock::given(method("GET"))
        .and(path("/jwks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jwks))
        .mount(&server)
        .await;

    server
}

fn sign(claims: Value, kid: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(SIGNING_KEY.as_bytes()).unwrap();
    encode(&header, &claims, &key).unwrap()
}

fn claims(issuer: &str, audience: &str, expires_in: i64) -> Value {
    json!({
        "iss": issuer,
        "aud": audience,
        "sub": "oidc|dana",
        "email": "dana@example.com",
        "given_name": "Dana",
        "family_name": "Scully",
        "iat": Utc::now().timestamp(),
        "exp": Utc::now().timestamp() + expires_in,
    })
}

#[tokio::test]
async fn test_valid_token_resolves_and_keys_are_cached() {
    let server = provider(1).await;
    let resolver = OidcIdentityResolver::new(&server.uri(), AUDIENCE, 3600);
    let token = sign(claims(&server.uri(), AUDIENCE, 600), "test-key");

    let identity = resolver.resolve(&token).await.unwrap();
    assert_eq!(identity.external_id, "oidc|dana");
    assert_eq!(identity.email, "dana@example.com");
    assert_eq!(identity.first_name.as_deref(), Some("Dana"));
    assert_eq!(identity.last_name.as_deref(), Some("Scully"));

    // Served from cache; the discovery mock verifies a single fetch on drop
    resolver.resolve(&token).await.unwrap();
}

#[tokio::test]
async fn test_expired_token() {
    let server = provider(1).await;
    let resolver = OidcIdentityResolver::new(&server.uri(), AUDIENCE, 3600);
    let token = sign(claims(&server.uri(), AUDIENCE, -3600), "test-key");

    let result = resolver.resolve(&token).await;
    assert!(matches!(result, Err(IdentityError::Expired)));
}

#[tokio::test]
async fn test_wrong_audience_and_issuer_are_invalid() {
    let server = provider(1).await;
    let resolver = OidcIdentityResolver::new(&server.uri(), AUDIENCE, 3600);

    let wrong_audience = sign(claims(&server.uri(), "someone-else", 600), "test-key");
    assert!(matches!(
        resolver.resolve(&wrong_audience).await,
        Err(IdentityError::Invalid(_))
    ));

    let wrong_issuer = sign(claims("https://evil.example.com", AUDIENCE, 600), "test-key");
    assert!(matches!(
        resolver.resolve(&wrong_issuer).await,
        Err(IdentityError::Invalid(_))
    ));
}

#[tokio::test]
async fn test_unknown_kid_forces_one_refresh() {
    let server = provider(2).await;
    let resolver = OidcIdentityResolver::new(&server.uri(), AUDIENCE, 3600);
    let token = sign(claims(&server.uri(), AUDIENCE, 600), "rotated-key");

    let result = resolver.resolve(&token).await;
    assert!(matches!(result, Err(IdentityError::Invalid(_))));
}

#[tokio::test]
async fn test_unreachable_provider_is_unavailable() {
    let server = MockServer::start().await;
    let resolver = OidcIdentityResolver::new(&server.uri(), AUDIENCE, 3600);
    let token = sign(claims(&server.uri(), AUDIENCE, 600), "test-key");

    let result = resolver.resolve(&token).await;
    assert!(matches!(result, Err(IdentityError::Unavailable(_))));
}

#[tokio::test]
async fn test_register_through_oidc() {
    let server = provider(1).await;
    let pool = database::connect_in_memory().await.unwrap();
    let resolver = Arc::new(OidcIdentityResolver::new(&server.uri(), AUDIENCE, 3600));
    let router = hc_platform::build_app(pool.clone(), resolver, &HttpConfig::default());
    let app = common::TestApp { router, pool };

    let token = sign(claims(&server.uri(), AUDIENCE, 600), "test-key");
    let (status, user) = app.request(Method::POST, "/register", Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["externalId"], json!("oidc|dana"));
    assert_eq!(user["email"], json!("dana@example.com"));

    let expired = sign(claims(&server.uri(), AUDIENCE, -3600), "test-key");
    let (status, _) = app.get("/me", &expired).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
