/**
 * Account Lifecycle Handlers
 *
 * - `PUT /api/auth/disable-account` (guarded) - hide the account, end the session
 * - `PUT /api/auth/enable-account` (public) - re-enable with username and password
 *
 * A disabled account cannot log in, is left out of the sidebar, and cannot
 * send or receive messages until it is enabled again.
 */
use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Json},
};

use crate::backend::auth::handlers::login::INVALID_CREDENTIALS;
use crate::backend::auth::handlers::profile::INCORRECT_PASSWORD;
use crate::backend::auth::handlers::types::{AccountResponse, EnableAccountRequest, PasswordConfirmation};
use crate::backend::auth::password::verify_password;
use crate::backend::auth::sessions::clear_session_cookie;
use crate::backend::auth::users::{get_user_by_username, set_disabled};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

/// Disable account handler
pub async fn disable_account(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    Json(request): Json<PasswordConfirmation>,
) -> Result<impl IntoResponse, BackendError> {
    if !verify_password(&request.password, &auth.user.password_hash)? {
        return Err(BackendError::bad_request(INCORRECT_PASSWORD));
    }

    let user = set_disabled(&app_state.db_pool, auth.id(), true)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    app_state.presence.unregister_user(&user.id);

    tracing::info!("[Auth] Disabled account {}", user.id);

    Ok((
        [(SET_COOKIE, clear_session_cookie(&app_state.auth))],
        Json(AccountResponse {
            message: "Account disabled successfully".to_string(),
            user: user.to_profile(),
        }),
    ))
}

/// Enable account handler
///
/// # Errors
///
/// * `400 Bad Request` - missing fields, unknown user, wrong password, or
///   account not disabled
pub async fn enable_account(
    State(app_state): State<AppState>,
    Json(request): Json<EnableAccountRequest>,
) -> Result<Json<AccountResponse>, BackendError> {
    let username = request.username.trim().to_lowercase();
    if username.is_empty() || request.password.is_empty() {
        return Err(BackendError::bad_request("Username and password are required"));
    }

    let user = get_user_by_username(&app_state.db_pool, &username)
        .await?
        .ok_or_else(|| BackendError::bad_request(INVALID_CREDENTIALS))?;

    if !user.is_disabled {
        return Err(BackendError::bad_request("Account is already enabled"));
    }
    if !verify_password(&request.password, &user.password_hash)? {
        return Err(BackendError::bad_request(INVALID_CREDENTIALS));
    }

    let user = set_disabled(&app_state.db_pool, &user.id, false)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    tracing::info!("[Auth] Enabled account {}", user.id);

    Ok(Json(AccountResponse {
        message: "Account enabled successfully".to_string(),
        user: user.to_profile(),
    }))
}
