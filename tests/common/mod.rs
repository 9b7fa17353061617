//! Common test utilities and helpers
//!
//! This module provides shared utilities for the integration tests:
//! - An in-memory app wired exactly like the server
//! - JSON request helpers driven through `tower::ServiceExt::oneshot`
//! - Account helpers
//! - Custom assertion macros

#![allow(dead_code)]

pub mod assertions;
pub mod auth_helpers;

pub use auth_helpers::*;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use duetchat::backend::media::MediaSettings;
use duetchat::backend::routes::create_router;
use duetchat::backend::server::{build_state, AppState, ServerConfig};

pub const TEST_SECRET: &str = "integration-test-secret";

/// App under test plus direct access to its state
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub config: ServerConfig,
}

/// Status, headers and decoded JSON body of one response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `jwt=<token>` from `Set-Cookie`, ready to send back as `Cookie`
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string)
    }

    pub fn raw_set_cookie(&self) -> Option<&str> {
        self.headers.get(header::SET_COOKIE).and_then(|value| value.to_str().ok())
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

pub fn test_config(media: Option<MediaSettings>) -> ServerConfig {
    ServerConfig {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        bcrypt_cost: 4,
        realtime_buffer: 16,
        media,
        ..ServerConfig::default()
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_media(None).await
    }

    pub async fn with_media(media: Option<MediaSettings>) -> Self {
        let config = test_config(media);
        let state = build_state(&config).await.expect("Failed to build test state");
        let router = create_router(state.clone(), &config);
        Self { state, router, config }
    }

    /// Send a JSON request, optionally carrying a session cookie
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, None, cookie).await
    }

    pub async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.request(Method::POST, uri, Some(body), cookie).await
    }

    pub async fn put(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.request(Method::PUT, uri, Some(body), cookie).await
    }

    pub async fn delete(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, Some(body), cookie).await
    }
}
