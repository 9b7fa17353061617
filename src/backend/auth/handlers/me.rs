/**
 * Current User Handler
 *
 * `GET /api/auth/check` returns the account behind the session. The route
 * guard has already verified the token and loaded the user.
 */
use axum::response::Json;

use crate::backend::middleware::AuthUser;
use crate::shared::UserProfile;

pub async fn check_auth(AuthUser(auth): AuthUser) -> Json<UserProfile> {
    Json(auth.user.to_profile())
}
