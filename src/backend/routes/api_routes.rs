/**
 * API Route Handlers
 *
 * This module defines the `/api` routes.
 *
 * # Routes
 *
 * ## Public
 * - `POST /api/auth/signup` - User registration
 * - `POST /api/auth/login` - User login
 * - `POST /api/auth/logout` - Clear the session cookie
 * - `PUT /api/auth/enable-account` - Re-enable a disabled account
 * - `GET /api/realtime` - SSE stream (anonymous without a valid token)
 *
 * ## Guarded
 * - `GET /api/auth/check` - Current user
 * - `PUT /api/auth/update-profile` - Profile update
 * - `DELETE /api/auth/delete-profile` - Account deletion
 * - `PUT /api/auth/disable-account` - Account disable
 * - `GET /api/messages/users` - Sidebar users
 * - `GET /api/messages/{id}` - Conversation
 * - `POST /api/messages/send/{id}` - Send a message
 * - `GET /api/presence` - Online user ids
 */
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::backend::auth::{
    check_auth, delete_profile, disable_account, enable_account, login, logout, signup, update_profile,
};
use crate::backend::messaging::{get_messages, get_users, send_message};
use crate::backend::middleware::auth_middleware;
use crate::backend::presence::get_online_users;
use crate::backend::realtime::handle_realtime_subscription;
use crate::backend::server::state::AppState;

/// Routes that need no session
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/enable-account", put(enable_account))
        .route("/api/realtime", get(handle_realtime_subscription))
}

/// Routes behind `auth_middleware`
///
/// `route_layer` keeps the guard off unmatched paths, so unknown URLs still
/// reach the fallback instead of answering 401.
fn protected_routes(app_state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/check", get(check_auth))
        .route("/api/auth/update-profile", put(update_profile))
        .route("/api/auth/delete-profile", delete(delete_profile))
        .route("/api/auth/disable-account", put(disable_account))
        .route("/api/messages/users", get(get_users))
        .route("/api/messages/{id}", get(get_messages))
        .route("/api/messages/send/{id}", post(send_message))
        .route("/api/presence", get(get_online_users))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), auth_middleware))
}

/// Configure API routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
/// * `app_state` - State the route guard resolves sessions against
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    router.merge(public_routes()).merge(protected_routes(app_state))
}
