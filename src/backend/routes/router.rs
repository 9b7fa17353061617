/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. API routes (auth, messages, presence, realtime)
 * 2. Fallback: the built web client when `static_dir` is set, otherwise a
 *    JSON 404
 *
 * # Layers
 *
 * - `DefaultBodyLimit` sized for base64 image payloads
 * - `CorsLayer` with credentials for the configured client origin
 * - `TraceLayer` for request spans
 */
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "message": "Not Found", "status": 404 })),
    )
}

/// CORS for a web client served from another origin
///
/// Cookies only flow cross-origin with credentials allowed, which rules out
/// a wildcard origin.
fn cors_layer(origin: &str) -> Option<CorsLayer> {
    let origin = match HeaderValue::from_str(origin) {
        Ok(origin) => origin,
        Err(e) => {
            tracing::warn!("[Server] Ignoring invalid client origin {:?}: {}", origin, e);
            return None;
        }
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    )
}

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state shared by all handlers
/// * `config` - Server configuration (body limit, CORS origin, static dir)
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState, config: &ServerConfig) -> Router<()> {
    let router = configure_api_routes(Router::new(), &app_state);

    // Client-side routing: unknown paths get index.html
    let router = match &config.static_dir {
        Some(dir) => {
            tracing::info!("[Server] Serving web client from {}", dir.display());
            let index = ServeFile::new(dir.join("index.html"));
            router.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => router.fallback(not_found),
    };

    let mut router = router
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = config.client_origin.as_deref().and_then(cors_layer) {
        router = router.layer(cors);
    }

    router.with_state(app_state)
}
