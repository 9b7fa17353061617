//! Authentication test helpers
//!
//! Provides utilities for creating accounts through the public API and
//! carrying their session into later requests.

use serde_json::json;

use super::TestApp;

pub const TEST_PASSWORD: &str = "password123";

/// Account created through `POST /api/auth/signup`
pub struct TestUser {
    pub id: String,
    pub username: String,
    pub password: String,
    pub token: String,
    /// `jwt=<token>`
    pub cookie: String,
}

impl TestUser {
    pub fn cookie(&self) -> Option<&str> {
        Some(self.cookie.as_str())
    }
}

/// Sign up `username` and return its session
pub async fn signup_user(app: &TestApp, fullname: &str, username: &str) -> TestUser {
    let response = app
        .post(
            "/api/auth/signup",
            json!({
                "fullname": fullname,
                "username": username,
                "password": TEST_PASSWORD,
                "gender": "female",
            }),
            None,
        )
        .await;
    assert_eq!(response.status.as_u16(), 201, "signup failed: {:?}", response.body);

    TestUser {
        id: response.body["user"]["_id"].as_str().unwrap().to_string(),
        username: response.body["user"]["username"].as_str().unwrap().to_string(),
        password: TEST_PASSWORD.to_string(),
        token: response.body["token"].as_str().unwrap().to_string(),
        cookie: response.session_cookie().expect("signup sets a session cookie"),
    }
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
