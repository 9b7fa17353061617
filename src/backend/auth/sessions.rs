/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT creation and validation for user sessions, and the
 * `jwt` cookie that carries the token between browser and server.
 *
 * # Token Transport
 *
 * A token is accepted from, in order:
 * 1. the `jwt` cookie (set on signup and login)
 * 2. an `Authorization: Bearer <token>` header
 *
 * The realtime endpoint additionally accepts `?token=` because EventSource
 * cannot set headers.
 */
use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap,
};
use jsonwebtoken::{decode, encode, get_current_timestamp, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "jwt";

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Longest accepted token lifetime (ten years)
pub const MAX_TOKEN_TTL_DAYS: u64 = 3650;

/// Settings shared by every auth code path
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Token and cookie lifetime in days
    pub token_ttl_days: u64,
    /// Add `Secure` to the session cookie
    pub cookie_secure: bool,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl AuthSettings {
    pub fn token_ttl_secs(&self) -> u64 {
        self.token_ttl_days.saturating_mul(SECONDS_PER_DAY)
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Username at the time of issue
    pub username: String,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Create a JWT token for a user
pub fn create_token(
    settings: &AuthSettings,
    user_id: &str,
    username: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = get_current_timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        iat: now,
        exp: now.saturating_add(settings.token_ttl_secs()),
    };

    let key = EncodingKey::from_secret(settings.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
pub fn verify_token(settings: &AuthSettings, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(settings.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}

/// `Set-Cookie` value that stores `token` in the session cookie
pub fn session_cookie(settings: &AuthSettings, token: &str) -> String {
    build_cookie(settings, token, settings.token_ttl_secs())
}

/// `Set-Cookie` value that clears the session cookie
pub fn clear_session_cookie(settings: &AuthSettings) -> String {
    build_cookie(settings, "", 0)
}

fn build_cookie(settings: &AuthSettings, value: &str, max_age: u64) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        SESSION_COOKIE, value, max_age
    );
    if settings.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Find a session token in the request headers
///
/// Cookie first, then bearer header. Empty values count as absent.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    cookie_token(headers).or_else(|| bearer_token(headers))
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
