/**
 * Real-time Subscription Handler
 *
 * This module implements the Server-Sent Events handler for
 * `GET /api/realtime`. Opening the stream is the connection-establish event
 * for presence; dropping it is the connection-close event.
 *
 * # Authentication
 *
 * The session token is read from the `jwt` cookie, the bearer header, or
 * `?token=` (EventSource cannot set headers). A valid token for an enabled
 * account registers the connection for that user. Anything else yields an
 * anonymous connection that still receives online-user broadcasts.
 *
 * # Connection Management
 *
 * - Attach to the hub first, then register with presence, so the new
 *   connection receives the online snapshot that registration broadcasts
 * - A `ConnectionGuard` owned by the stream detaches and unregisters when
 *   the client goes away
 * - A `sessionReplaced` event is the last one a stream delivers
 * - Keep-alive comments hold idle connections open
 */
use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{self, Stream};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::backend::auth::sessions::token_from_headers;
use crate::backend::middleware::auth::resolve_session;
use crate::backend::presence::PresenceRegistry;
use crate::backend::realtime::hub::ConnectionHub;
use crate::backend::server::state::AppState;
use crate::shared::{EventType, RealtimeEvent};

#[derive(Debug, Default, Deserialize)]
pub struct RealtimeQuery {
    #[serde(default)]
    pub token: Option<String>,
}

/// Cleans up a connection when its stream is dropped
struct ConnectionGuard {
    connection_id: String,
    hub: Arc<ConnectionHub>,
    presence: Arc<PresenceRegistry>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        // Detach first so the offline broadcast skips this connection.
        self.hub.detach(&self.connection_id);
        self.presence.unregister_connection(&self.connection_id);
        tracing::info!("[Realtime] Connection {} closed", self.connection_id);
    }
}

struct StreamState {
    events: mpsc::Receiver<RealtimeEvent>,
    finished: bool,
    _guard: ConnectionGuard,
}

fn to_sse_event(event: &RealtimeEvent) -> Event {
    Event::default()
        .event(event.event_type.name())
        .data(event.payload.to_string())
}

/// Handle real-time subscription (GET /api/realtime)
///
/// # Example Response
///
/// ```http
/// HTTP/1.1 200 OK
/// Content-Type: text/event-stream
///
/// event: getOnlineUsers
/// data: ["5f0c...","9a1e..."]
///
/// event: newMessage
/// data: {"_id":"...","senderId":"...","receiverId":"...","text":"hi",...}
/// ```
pub async fn handle_realtime_subscription(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RealtimeQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let token = token_from_headers(&headers).or(query.token.filter(|t| !t.is_empty()));

    let user_id = match token {
        Some(token) => match resolve_session(&app_state, &token).await {
            Ok(user) => Some(user.id),
            Err(e) => {
                tracing::debug!("[Realtime] Treating connection as anonymous: {}", e);
                None
            }
        },
        None => None,
    };

    let (connection_id, events) = app_state.hub.attach();
    let registration = app_state
        .presence
        .register_connection(user_id.as_deref(), &connection_id);
    tracing::info!(
        "[Realtime] Connection {} opened ({:?})",
        connection_id,
        registration
    );

    let state = StreamState {
        events,
        finished: false,
        _guard: ConnectionGuard {
            connection_id,
            hub: app_state.hub.clone(),
            presence: app_state.presence.clone(),
        },
    };

    let stream = stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }

        let event = state.events.recv().await?;
        if event.event_type == EventType::SessionReplaced {
            state.finished = true;
        }

        Some((Ok(to_sse_event(&event)), state))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
