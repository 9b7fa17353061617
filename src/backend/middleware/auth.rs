/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It extracts and verifies the session token, loads
 * the account, and hands it to handlers through request extensions.
 *
 * # Rejections
 *
 * - no token: 401 "Unauthorized: No token provided"
 * - bad or expired token: 401 "Unauthorized: Invalid or expired token"
 * - account gone: 404 "User not found"
 * - account disabled: 403
 */
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::backend::auth::sessions::{token_from_headers, verify_token};
use crate::backend::auth::users::{get_user_by_id, User};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

pub const NO_TOKEN: &str = "Unauthorized: No token provided";
pub const INVALID_TOKEN: &str = "Unauthorized: Invalid or expired token";
pub const ACCOUNT_DISABLED: &str = "Account is disabled. Please contact support.";

/// Authenticated account attached to the request by `auth_middleware`
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user: User,
}

impl AuthenticatedUser {
    pub fn id(&self) -> &str {
        &self.user.id
    }
}

/// Resolve a session token to an enabled account
///
/// Shared by the route guard and the realtime endpoint.
pub async fn resolve_session(app_state: &AppState, token: &str) -> Result<User, BackendError> {
    let claims = verify_token(&app_state.auth, token).map_err(|e| {
        tracing::debug!("[Auth] Rejected token: {}", e);
        BackendError::unauthorized(INVALID_TOKEN)
    })?;

    let user = get_user_by_id(&app_state.db_pool, &claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::warn!("[Auth] Token for unknown user {}", claims.sub);
            BackendError::not_found("User not found")
        })?;

    if user.is_disabled {
        return Err(BackendError::forbidden(ACCOUNT_DISABLED));
    }

    Ok(user)
}

/// Authentication middleware
///
/// This middleware:
/// 1. Reads the token from the `jwt` cookie or the bearer header
/// 2. Verifies it and loads the account
/// 3. Attaches `AuthenticatedUser` to request extensions
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = token_from_headers(request.headers())
        .ok_or_else(|| BackendError::unauthorized(NO_TOKEN))?;

    let user = resolve_session(&app_state, &token).await?;
    request.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only valid on routes behind `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("[Auth] AuthenticatedUser not found in request extensions");
                BackendError::unauthorized(NO_TOKEN)
            })
    }
}
