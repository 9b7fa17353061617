/**
 * Login and Logout Handlers
 *
 * `POST /api/auth/login` verifies credentials and issues a session;
 * `POST /api/auth/logout` clears the session cookie.
 *
 * # Security
 *
 * - Unknown usernames and wrong passwords get the same 400 response
 * - Disabled accounts are refused with 403 before the password is checked
 * - Passwords are never logged or returned
 */
use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Json},
};

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest, MessageResponse};
use crate::backend::auth::password::verify_password;
use crate::backend::auth::sessions::{clear_session_cookie, create_token, session_cookie};
use crate::backend::auth::users::get_user_by_username;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - unknown user or wrong password
/// * `403 Forbidden` - account is disabled
pub async fn login(
    State(app_state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, BackendError> {
    let username = request.username.trim().to_lowercase();

    let user = get_user_by_username(&app_state.db_pool, &username)
        .await?
        .ok_or_else(|| BackendError::bad_request(INVALID_CREDENTIALS))?;

    if user.is_disabled {
        tracing::info!("[Auth] Login refused for disabled account {}", user.id);
        return Err(BackendError::forbidden(
            "Your account has been disabled. Please contact support or enable your account to proceed.",
        ));
    }

    if !verify_password(&request.password, &user.password_hash)? {
        tracing::debug!("[Auth] Wrong password for {}", user.username);
        return Err(BackendError::bad_request(INVALID_CREDENTIALS));
    }

    let token = create_token(&app_state.auth, &user.id, &user.username)?;
    tracing::info!("[Auth] {} logged in", user.username);

    Ok((
        [(SET_COOKIE, session_cookie(&app_state.auth, &token))],
        Json(AuthResponse {
            message: "User logged in successfully!".to_string(),
            user: user.to_profile(),
            token,
        }),
    ))
}

/// Logout handler
///
/// Always succeeds, with or without a session.
pub async fn logout(State(app_state): State<AppState>) -> impl IntoResponse {
    (
        [(SET_COOKIE, clear_session_cookie(&app_state.auth))],
        Json(MessageResponse::new("Logged out successfully")),
    )
}
