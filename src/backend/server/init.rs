/**
 * Server Initialization
 *
 * This module builds the application state and router from a validated
 * `ServerConfig`.
 *
 * # Initialization Process
 *
 * 1. Open the SQLite database and run migrations
 * 2. Build the media uploader (inactive when no asset host is configured)
 * 3. Wire the connection hub into a fresh presence registry
 * 4. Create the router with all routes and middleware
 *
 * The presence registry always starts empty; nothing about who was online
 * survives a restart.
 */
use axum::Router;

use crate::backend::media::MediaUploader;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{connect_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Build `AppState` from configuration
pub async fn build_state(config: &ServerConfig) -> Result<AppState, sqlx::Error> {
    let db_pool = connect_database(&config.database_url).await?;

    let media = MediaUploader::new(config.media.clone());
    if media.is_configured() {
        tracing::info!("[Server] Image uploads enabled");
    } else {
        tracing::warn!("[Server] No asset host configured; image uploads will be rejected");
    }

    Ok(AppState::new(
        db_pool,
        config.auth_settings(),
        media,
        config.realtime_buffer,
    ))
}

/// Create and configure the Axum application
pub async fn create_app(config: &ServerConfig) -> Result<Router<()>, sqlx::Error> {
    tracing::info!("[Server] Initializing duetchat backend");

    let app_state = build_state(config).await?;
    let app = create_router(app_state, config);

    tracing::info!("[Server] Router configured");
    Ok(app)
}
