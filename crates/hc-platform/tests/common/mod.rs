//! Shared fixtures for the HTTP integration suites.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use hc_config::HttpConfig;
use hc_platform::identity::{ExternalIdentity, StaticIdentityResolver};
use hc_platform::shared::database;

pub const ALICE: &str = "alice-token";
pub const BOB: &str = "bob-token";
pub const CAROL: &str = "carol-token";
pub const EXPIRED: &str = "expired-token";

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

impl TestApp {
    /// Full application over a fresh in-memory store.
    pub async fn new() -> Self {
        let pool = database::connect_in_memory()
            .await
            .expect("in-memory database");

        let resolver = StaticIdentityResolver::new()
            .with_identity(
                ALICE,
                ExternalIdentity::new("auth0|alice", "alice@example.com").with_name("Alice", "Liddell"),
            )
            .with_identity(
                BOB,
                ExternalIdentity::new("auth0|bob", "bob@example.com").with_name("Bob", "Builder"),
            )
            .with_identity(CAROL, ExternalIdentity::new("auth0|carol", "carol@example.com"))
            .with_expired(EXPIRED);

        let http = HttpConfig {
            cors_origins: vec!["*".to_string()],
            ..HttpConfig::default()
        };

        let router = hc_platform::build_app(pool.clone(), Arc::new(resolver), &http);
        Self { router, pool }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), body).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Register the token's user; panics unless the user is new.
    pub async fn register(&self, token: &str) -> Value {
        let (status, body) = self.request(Method::POST, "/register", Some(token), None).await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body
    }

    /// Bootstrap an organization owned by the token's user.
    pub async fn create_organization(&self, token: &str, name: &str) -> Value {
        let (status, body) = self
            .post("/me/organizations", token, serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create organization failed: {}", body);
        body
    }

    /// Invite and accept; returns the new partner.
    pub async fn join(&self, admin_token: &str, organization_id: &str, token: &str, email: &str) -> Value {
        let (status, invitation) = self
            .post(
                &format!("/organizations/{}/invitations", organization_id),
                admin_token,
                serde_json::json!({ "email": email }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "invite failed: {}", invitation);

        let code = invitation["code"].as_str().expect("code");
        let (status, partner) = self.get(&format!("/invitations/{}/accept", code), token).await;
        assert_eq!(status, StatusCode::OK, "accept failed: {}", partner);
        partner
    }

    pub async fn anchor_circle_id(&self, token: &str, organization_id: &str) -> String {
        let (status, circle) = self
            .get(&format!("/organizations/{}/anchor_circle", organization_id), token)
            .await;
        assert_eq!(status, StatusCode::OK);
        id_of(&circle)
    }

    pub async fn count(&self, sql: &str, bind: &str) -> i64 {
        sqlx::query_scalar(sql)
            .bind(bind)
            .fetch_one(&self.pool)
            .await
            .expect("count query")
    }
}

impl TestApp {
    pub async fn count_rows(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .expect("count query")
    }
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id").to_string()
}

pub fn error_type(value: &Value) -> &str {
    value["errors"][0]["type"].as_str().unwrap_or_default()
}

pub fn total(value: &Value) -> u64 {
    value["total"].as_u64().expect("total")
}
