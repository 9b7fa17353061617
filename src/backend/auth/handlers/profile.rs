/**
 * Profile Handlers
 *
 * - `PUT /api/auth/update-profile` - change avatar, bio or gender
 * - `DELETE /api/auth/delete-profile` - remove the account and its messages
 *
 * Both run behind the route guard.
 */
use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Json},
};

use crate::backend::auth::handlers::types::{
    check_max_len, MessageResponse, PasswordConfirmation, UpdateProfileRequest, MAX_BIO_LEN,
};
use crate::backend::auth::password::verify_password;
use crate::backend::auth::sessions::clear_session_cookie;
use crate::backend::auth::users::{delete_user_and_messages, update_profile as save_profile, ProfileUpdate};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{Gender, UserProfile};

pub const INCORRECT_PASSWORD: &str = "Incorrect password";

/// Update profile handler
///
/// Fields are validated before the avatar is uploaded, so a bad gender or
/// bio never costs an upload.
///
/// # Errors
///
/// * `400 Bad Request` - invalid gender, bio too long, or nothing to update
/// * `404 Not Found` - the account vanished mid-request
/// * `502`/`503` - avatar upload failed or uploads are not configured
pub async fn update_profile(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, BackendError> {
    let mut update = ProfileUpdate::default();

    if let Some(bio) = request.bio {
        check_max_len("bio", "Bio", &bio, MAX_BIO_LEN)?;
        update.bio = Some(bio);
    }
    if let Some(gender) = request.gender {
        update.gender = Some(Gender::parse(&gender)?);
    }
    if let Some(picture) = request.profile_pic.filter(|p| !p.is_empty()) {
        update.profile_pic = Some(app_state.media.upload(&picture).await?);
    }

    if update.is_empty() {
        return Err(BackendError::bad_request("No valid fields to update"));
    }

    let user = save_profile(&app_state.db_pool, auth.id(), &update)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    tracing::info!("[Auth] Updated profile of {}", user.id);
    Ok(Json(user.to_profile()))
}

/// Delete profile handler
///
/// Removes the account and every message it sent or received in one
/// transaction, drops it from the online set and clears the cookie.
pub async fn delete_profile(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    Json(request): Json<PasswordConfirmation>,
) -> Result<impl IntoResponse, BackendError> {
    if !verify_password(&request.password, &auth.user.password_hash)? {
        return Err(BackendError::bad_request(INCORRECT_PASSWORD));
    }

    let removed_messages = delete_user_and_messages(&app_state.db_pool, auth.id()).await?;
    app_state.presence.unregister_user(auth.id());

    tracing::info!(
        "[Auth] Deleted account {} and {} messages",
        auth.id(),
        removed_messages
    );

    Ok((
        [(SET_COOKIE, clear_session_cookie(&app_state.auth))],
        Json(MessageResponse::new("Account deleted successfully!")),
    ))
}
