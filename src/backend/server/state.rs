/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is the central state container, holding:
 * - The SQLite connection pool
 * - The presence registry and the connection hub it pushes through
 * - Auth settings (JWT secret, cookie flags, bcrypt cost)
 * - The media uploader
 *
 * Every field is cheap to clone (`Arc` or pool handle), so axum clones the
 * state per request.
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers take only what they use:
 *
 * ```rust,no_run
 * use axum::extract::State;
 * use std::sync::Arc;
 * use duetchat::backend::presence::PresenceRegistry;
 *
 * async fn handler(State(presence): State<Arc<PresenceRegistry>>) -> String {
 *     presence.online_users().join(",")
 * }
 * ```
 */
use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::auth::sessions::AuthSettings;
use crate::backend::media::MediaUploader;
use crate::backend::presence::PresenceRegistry;
use crate::backend::realtime::ConnectionHub;

#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub db_pool: SqlitePool,

    /// Online users and the live message relay
    pub presence: Arc<PresenceRegistry>,

    /// Outbound channels of every open realtime stream
    ///
    /// The same hub is the registry's transport.
    pub hub: Arc<ConnectionHub>,

    pub auth: Arc<AuthSettings>,

    pub media: Arc<MediaUploader>,
}

impl AppState {
    /// Assemble state around an open pool
    ///
    /// Wires a fresh hub into a fresh registry; nothing is shared with any
    /// other `AppState`.
    pub fn new(db_pool: SqlitePool, auth: AuthSettings, media: MediaUploader, realtime_buffer: usize) -> Self {
        let hub = Arc::new(ConnectionHub::new(realtime_buffer));
        let presence = Arc::new(PresenceRegistry::new(hub.clone()));

        Self {
            db_pool,
            presence,
            hub,
            auth: Arc::new(auth),
            media: Arc::new(media),
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for Arc<PresenceRegistry> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.presence.clone()
    }
}

impl FromRef<AppState> for Arc<ConnectionHub> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}

impl FromRef<AppState> for Arc<AuthSettings> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for Arc<MediaUploader> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.media.clone()
    }
}
