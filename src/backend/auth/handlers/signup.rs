/**
 * Signup Handler
 *
 * This module implements the user registration handler for POST /api/auth/signup.
 *
 * # Registration Process
 *
 * 1. Normalize: trim and lower-case the username, trim and title-case the
 *    full name
 * 2. Validate required fields, password length, field lengths and gender
 * 3. Reject a taken username
 * 4. Hash the password with bcrypt
 * 5. Create the user with a generated avatar
 * 6. Issue a session token and set the `jwt` cookie
 */
use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Json},
};

use crate::backend::auth::handlers::types::{
    check_max_len, default_profile_pic, title_case, AuthResponse, SignupRequest, MAX_FULLNAME_LEN,
    MAX_USERNAME_LEN, MIN_PASSWORD_LEN,
};
use crate::backend::auth::password::hash_password;
use crate::backend::auth::sessions::{create_token, session_cookie};
use crate::backend::auth::users::{create_user, get_user_by_username, NewUser};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::Gender;

const USER_EXISTS: &str = "User already exists!";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Signup handler
///
/// # Errors
///
/// * `400 Bad Request` - missing field, short password, field too long,
///   invalid gender, or username taken
/// * `500 Internal Server Error` - hashing, database or token failure
pub async fn signup(
    State(app_state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, BackendError> {
    let username = request.username.unwrap_or_default().trim().to_lowercase();
    let fullname = title_case(request.fullname.unwrap_or_default().trim());
    let password = request.password.unwrap_or_default();
    let gender = request.gender.unwrap_or_default();

    if fullname.is_empty() || username.is_empty() || password.is_empty() || gender.is_empty() {
        return Err(BackendError::bad_request("All fields are required"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(BackendError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    check_max_len("fullname", "Full name", &fullname, MAX_FULLNAME_LEN)?;
    check_max_len("username", "Username", &username, MAX_USERNAME_LEN)?;
    let gender = Gender::parse(&gender)?;

    if get_user_by_username(&app_state.db_pool, &username).await?.is_some() {
        tracing::debug!("[Auth] Signup for taken username {}", username);
        return Err(BackendError::bad_request(USER_EXISTS));
    }

    let password_hash = hash_password(&password, app_state.auth.bcrypt_cost)?;
    let profile_pic = default_profile_pic(&fullname);

    let user = create_user(
        &app_state.db_pool,
        NewUser {
            fullname,
            username,
            password_hash,
            gender,
            profile_pic,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            BackendError::bad_request(USER_EXISTS)
        } else {
            BackendError::from(e)
        }
    })?;

    let token = create_token(&app_state.auth, &user.id, &user.username)?;
    tracing::info!("[Auth] Registered {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, session_cookie(&app_state.auth, &token))],
        Json(AuthResponse {
            message: "User registered successfully!".to_string(),
            user: user.to_profile(),
            token,
        }),
    ))
}
