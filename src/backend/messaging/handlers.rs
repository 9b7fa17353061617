//! Messaging HTTP Handlers
//!
//! - `GET /api/messages/users` - sidebar: every enabled user except the caller
//! - `GET /api/messages/{id}` - conversation with one user, oldest first
//! - `POST /api/messages/send/{id}` - persist a message and relay it live
//!
//! All three sit behind the route guard, so the caller is known to exist
//! and be enabled when the request started.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::backend::auth::users::{get_user_by_id, list_active_users_except, User};
use crate::backend::error::BackendError;
use crate::backend::messaging::db::find_conversation;
use crate::backend::messaging::service::persist_and_relay;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{Message, SendMessageRequest, UserProfile};

const SENDER_UNAVAILABLE: &str = "Your account is disabled or does not exist.";
const PEER_UNAVAILABLE: &str = "The other user's account is disabled or does not exist.";
const RECEIVER_UNAVAILABLE: &str = "The receiver's account is disabled or does not exist.";
const EMPTY_MESSAGE: &str = "Message must include text or an image";

/// Load `user_id` and require that the account is enabled
async fn active_user(app_state: &AppState, user_id: &str, message: &str) -> Result<User, BackendError> {
    match get_user_by_id(&app_state.db_pool, user_id).await? {
        Some(user) if !user.is_disabled => Ok(user),
        _ => Err(BackendError::forbidden(message)),
    }
}

/// List users for the sidebar
pub async fn get_users(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> Result<Json<Vec<UserProfile>>, BackendError> {
    let users = list_active_users_except(&app_state.db_pool, auth.id()).await?;
    Ok(Json(users.iter().map(User::to_profile).collect()))
}

/// Conversation between the caller and `{id}`
pub async fn get_messages(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(other_id): Path<String>,
) -> Result<Json<Vec<Message>>, BackendError> {
    let me = active_user(&app_state, auth.id(), SENDER_UNAVAILABLE).await?;
    let other = active_user(&app_state, &other_id, PEER_UNAVAILABLE).await?;

    let messages = find_conversation(&app_state.db_pool, &me.id, &other.id).await?;
    Ok(Json(messages))
}

/// Send a message to `{id}`
///
/// The image, if any, is uploaded before anything is stored. The message is
/// relayed only after the insert commits; relay failures never fail the
/// request.
///
/// # Errors
///
/// * `400 Bad Request` - neither text nor image
/// * `403 Forbidden` - sender or receiver disabled or missing
/// * `502`/`503` - image upload failed or uploads are not configured
pub async fn send_message(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(receiver_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, BackendError> {
    let sender = active_user(&app_state, auth.id(), SENDER_UNAVAILABLE).await?;
    let receiver = active_user(&app_state, &receiver_id, RECEIVER_UNAVAILABLE).await?;

    let request = request.normalized();
    if request.is_empty() {
        return Err(BackendError::bad_request(EMPTY_MESSAGE));
    }

    let image = match request.image {
        Some(data) => Some(app_state.media.upload(&data).await?),
        None => None,
    };

    let message = Message::new(sender.id, receiver.id, request.text, image);
    let (message, _) = persist_and_relay(&app_state.db_pool, &app_state.presence, message).await?;

    Ok((StatusCode::CREATED, Json(message)))
}
