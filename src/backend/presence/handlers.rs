/**
 * Presence HTTP Handler
 *
 * `GET /api/presence` returns the current online set as a sorted array of
 * user ids, the same payload `getOnlineUsers` carries. Clients use it to
 * seed their view before the realtime stream delivers its first snapshot.
 */
use axum::{extract::State, response::Json};

use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

pub async fn get_online_users(State(app_state): State<AppState>, AuthUser(_): AuthUser) -> Json<Vec<String>> {
    Json(app_state.presence.online_users())
}
