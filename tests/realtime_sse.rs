//! Realtime stream integration tests
//!
//! Opens `GET /api/realtime` through the router and reads the SSE body.

mod common;

use std::time::Duration;

use axum::body::{Body, BodyDataStream};
use axum::http::{header, Request, StatusCode};
use futures_util::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{signup_user, TestApp};

/// Reads whole SSE events out of a response body
struct EventReader {
    body: BodyDataStream,
    buffer: String,
}

impl EventReader {
    async fn open(app: &TestApp, query: &str) -> Self {
        let request = Request::builder()
            .uri(format!("/api/realtime{}", query))
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/event-stream"
        );

        Self {
            body: response.into_body().into_data_stream(),
            buffer: String::new(),
        }
    }

    /// Next `(event name, JSON data)`, skipping keep-alive comments
    async fn next_event(&mut self) -> Option<(String, Value)> {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let block: String = self.buffer.drain(..end + 2).collect();
                let mut name = None;
                let mut data = String::new();
                for line in block.lines() {
                    if let Some(value) = line.strip_prefix("event:") {
                        name = Some(value.trim().to_string());
                    } else if let Some(value) = line.strip_prefix("data:") {
                        data.push_str(value.trim());
                    }
                }
                match name {
                    Some(name) => return Some((name, serde_json::from_str(&data).unwrap())),
                    None => continue,
                }
            }

            let chunk = tokio::time::timeout(Duration::from_secs(2), self.body.next())
                .await
                .expect("timed out waiting for an event")?
                .unwrap();
            self.buffer.push_str(&String::from_utf8_lossy(&chunk));
        }
    }
}

#[tokio::test]
async fn test_anonymous_stream_gets_snapshot() {
    let app = TestApp::new().await;
    let mut stream = EventReader::open(&app, "").await;

    let (name, data) = stream.next_event().await.unwrap();
    assert_eq!(name, "getOnlineUsers");
    assert_eq!(data, json!([]));
    assert!(app.state.presence.online_users().is_empty());
    assert_eq!(app.state.hub.connection_count(), 1);
}

#[tokio::test]
async fn test_invalid_token_stream_is_anonymous() {
    let app = TestApp::new().await;
    let mut stream = EventReader::open(&app, "?token=garbage").await;

    let (name, data) = stream.next_event().await.unwrap();
    assert_eq!(name, "getOnlineUsers");
    assert_eq!(data, json!([]));
}

#[tokio::test]
async fn test_authenticated_stream_goes_online_and_offline() {
    let app = TestApp::new().await;
    let jane = signup_user(&app, "Jane Doe", "jane").await;
    let omar = signup_user(&app, "Omar Khan", "omar").await;

    let mut observer = EventReader::open(&app, &format!("?token={}", omar.token)).await;
    let (_, data) = observer.next_event().await.unwrap();
    assert_eq!(data, json!([omar.id]));

    let jane_stream = EventReader::open(&app, &format!("?token={}", jane.token)).await;
    let (_, data) = observer.next_event().await.unwrap();
    let mut expected = vec![jane.id.clone(), omar.id.clone()];
    expected.sort();
    assert_eq!(data, json!(expected));

    let presence = app.get("/api/presence", omar.cookie()).await;
    assert_eq!(presence.body, json!(expected));

    drop(jane_stream);
    let (name, data) = observer.next_event().await.unwrap();
    assert_eq!(name, "getOnlineUsers");
    assert_eq!(data, json!([omar.id]));
    assert_eq!(app.state.hub.connection_count(), 1);
}

#[tokio::test]
async fn test_new_message_arrives_on_receiver_stream() {
    let app = TestApp::new().await;
    let jane = signup_user(&app, "Jane Doe", "jane").await;
    let omar = signup_user(&app, "Omar Khan", "omar").await;

    let mut omar_stream = EventReader::open(&app, &format!("?token={}", omar.token)).await;
    omar_stream.next_event().await.unwrap();

    let sent = app
        .post(&format!("/api/messages/send/{}", omar.id), json!({ "text": "over sse" }), jane.cookie())
        .await;
    assert_eq!(sent.status, StatusCode::CREATED);

    let (name, data) = omar_stream.next_event().await.unwrap();
    assert_eq!(name, "newMessage");
    assert_eq!(data, sent.body);
}

#[tokio::test]
async fn test_second_stream_replaces_the_first() {
    let app = TestApp::new().await;
    let jane = signup_user(&app, "Jane Doe", "jane").await;
    let query = format!("?token={}", jane.token);

    let mut first = EventReader::open(&app, &query).await;
    first.next_event().await.unwrap();

    let mut second = EventReader::open(&app, &query).await;
    let (name, data) = second.next_event().await.unwrap();
    assert_eq!(name, "getOnlineUsers");
    assert_eq!(data, json!([jane.id]));

    let (name, data) = first.next_event().await.unwrap();
    assert_eq!(name, "sessionReplaced");
    assert_eq!(data["userId"], jane.id.as_str());
    assert!(first.next_event().await.is_none());

    // The old stream closing leaves the newer registration alone.
    assert_eq!(app.state.presence.online_users(), vec![jane.id.clone()]);
    let current = app.state.presence.lookup_connection(&jane.id);
    assert!(current.is_some());
    assert_eq!(app.state.hub.connection_count(), 1);
}
