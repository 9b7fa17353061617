/**
 * Presence Registry & Message Relay
 *
 * Maps each logged-in user to the one live connection that currently
 * represents them, keeps every connected party informed of who is online,
 * and forwards freshly persisted messages to the receiver's connection.
 *
 * # Index
 *
 * Two maps kept in lockstep:
 * - `by_user`: user id -> connection id
 * - `by_connection`: connection id -> user id
 *
 * Every operation leaves them as exact inverses of each other, so
 * unregistering by connection is a single lookup.
 *
 * # Serialization
 *
 * All mutations take the index mutex, mutate, and broadcast the resulting
 * online set before releasing it. Nothing here awaits, so the lock is never
 * held across a suspension point, and the broadcasts go out in the same
 * order as the mutations that produced them.
 *
 * # Reconnects
 *
 * One connection per user, last connection wins. The connection being
 * replaced gets a `sessionReplaced` event and is then closed on the
 * transport even if that notice could not be queued, so the old stream
 * always ends. Its later unregister is a no-op and the newer connection
 * stays.
 */
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::backend::presence::transport::Transport;
use crate::shared::{Message, RealtimeEvent};

#[derive(Debug, Default)]
struct PresenceIndex {
    by_user: HashMap<String, String>,
    by_connection: HashMap<String, String>,
}

impl PresenceIndex {
    fn online_users(&self) -> Vec<String> {
        let mut users: Vec<String> = self.by_user.keys().cloned().collect();
        users.sort();
        users
    }
}

/// Result of `register_connection`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// No user id was supplied; the connection only receives broadcasts
    Anonymous,
    /// The user is now mapped to this connection
    Registered,
    /// The user was already mapped to another connection, which was dropped
    Replaced {
        previous_connection: String,
    },
}

/// Result of `relay_message`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Pushed to the receiver's connection
    Delivered(String),
    /// Receiver has no live connection; nothing was pushed
    Offline,
    /// Receiver had a connection but the push failed
    Dropped(String),
}

/// In-process presence registry
///
/// Constructed once at startup and shared through `AppState`. Independent
/// instances do not share any state.
pub struct PresenceRegistry {
    index: Mutex<PresenceIndex>,
    transport: Arc<dyn Transport>,
}

impl PresenceRegistry {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            index: Mutex::new(PresenceIndex::default()),
            transport,
        }
    }

    // Every operation leaves the index consistent before it can panic, so a
    // poisoned lock still guards valid data.
    fn index(&self) -> MutexGuard<'_, PresenceIndex> {
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `connection_id` for `user_id` and broadcast the online set
    ///
    /// A missing or empty `user_id` leaves the connection anonymous: it is
    /// not added to the index, but the current online set is still
    /// broadcast so the new connection receives a snapshot.
    pub fn register_connection(&self, user_id: Option<&str>, connection_id: &str) -> Registration {
        let mut index = self.index();

        let Some(user_id) = user_id.filter(|id| !id.is_empty()) else {
            tracing::debug!("[Presence] Anonymous connection {}", connection_id);
            self.broadcast_online(&index);
            return Registration::Anonymous;
        };

        // A connection id belongs to at most one user.
        if let Some(stale_user) = index.by_connection.remove(connection_id) {
            if stale_user != user_id {
                index.by_user.remove(&stale_user);
            }
        }

        let previous = index
            .by_user
            .insert(user_id.to_string(), connection_id.to_string());
        index
            .by_connection
            .insert(connection_id.to_string(), user_id.to_string());

        let registration = match previous {
            Some(previous_connection) if previous_connection != connection_id => {
                index.by_connection.remove(&previous_connection);
                tracing::info!(
                    "[Presence] User {} moved from connection {} to {}",
                    user_id,
                    previous_connection,
                    connection_id
                );
                if let Err(e) = self
                    .transport
                    .send_to_connection(&previous_connection, RealtimeEvent::session_replaced(user_id))
                {
                    tracing::warn!("[Presence] Could not notify replaced connection: {}", e);
                }
                self.transport.close(&previous_connection);
                Registration::Replaced { previous_connection }
            }
            _ => {
                tracing::info!("[Presence] User {} online on connection {}", user_id, connection_id);
                Registration::Registered
            }
        };

        self.broadcast_online(&index);
        registration
    }

    /// Remove whichever user maps to `connection_id` and rebroadcast
    ///
    /// Returns the removed user id. An unknown connection is a no-op and
    /// produces no broadcast.
    pub fn unregister_connection(&self, connection_id: &str) -> Option<String> {
        let mut index = self.index();

        let Some(user_id) = index.by_connection.remove(connection_id) else {
            tracing::debug!("[Presence] Connection {} was not registered", connection_id);
            return None;
        };
        index.by_user.remove(&user_id);

        tracing::info!("[Presence] User {} offline (connection {})", user_id, connection_id);
        self.broadcast_online(&index);
        Some(user_id)
    }

    /// Remove `user_id` regardless of which connection it holds
    ///
    /// Used when an account is disabled or deleted. Returns the connection
    /// that was unmapped; nothing is broadcast if the user was not online.
    pub fn unregister_user(&self, user_id: &str) -> Option<String> {
        let mut index = self.index();

        let connection_id = index.by_user.remove(user_id)?;
        index.by_connection.remove(&connection_id);

        tracing::info!("[Presence] User {} evicted (connection {})", user_id, connection_id);
        self.broadcast_online(&index);
        Some(connection_id)
    }

    /// Current connection for `user_id`, if any
    pub fn lookup_connection(&self, user_id: &str) -> Option<String> {
        self.index().by_user.get(user_id).cloned()
    }

    /// Sorted snapshot of online user ids
    pub fn online_users(&self) -> Vec<String> {
        self.index().online_users()
    }

    /// Push a persisted message to its receiver's connection, if any
    ///
    /// Best-effort and at-most-once. Never fails: a missing receiver is
    /// `Offline`, a failed push is `Dropped` and logged.
    pub fn relay_message(&self, message: &Message) -> RelayOutcome {
        let Some(connection_id) = self.lookup_connection(&message.receiver_id) else {
            tracing::debug!("[Relay] Receiver {} offline, message {} not pushed", message.receiver_id, message.id);
            return RelayOutcome::Offline;
        };

        let event = match RealtimeEvent::new_message(message) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("[Relay] Failed to encode message {}: {}", message.id, e);
                return RelayOutcome::Dropped(connection_id);
            }
        };

        match self.transport.send_to_connection(&connection_id, event) {
            Ok(()) => {
                tracing::debug!("[Relay] Message {} pushed to connection {}", message.id, connection_id);
                RelayOutcome::Delivered(connection_id)
            }
            Err(e) => {
                tracing::warn!("[Relay] Live push of message {} failed: {}", message.id, e);
                RelayOutcome::Dropped(connection_id)
            }
        }
    }

    fn broadcast_online(&self, index: &PresenceIndex) {
        let users = index.online_users();
        let reached = self.transport.broadcast(RealtimeEvent::online_users(&users));
        tracing::debug!("[Presence] Broadcast {} online users to {} connections", users.len(), reached);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::presence::transport::DeliveryError;
    use crate::shared::EventType;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[derive(Debug, Clone, PartialEq)]
    enum Push {
        To(String, RealtimeEvent),
        All(RealtimeEvent),
    }

    #[derive(Default)]
    struct RecordingTransport {
        pushes: Mutex<Vec<Push>>,
        unreachable: Mutex<HashSet<String>>,
        closed: Mutex<Vec<String>>,
    }

    impl RecordingTransport {
        fn take(&self) -> Vec<Push> {
            std::mem::take(&mut *self.pushes.lock().unwrap())
        }

        fn make_unreachable(&self, connection_id: &str) {
            self.unreachable.lock().unwrap().insert(connection_id.to_string());
        }

        fn closed(&self) -> Vec<String> {
            self.closed.lock().unwrap().clone()
        }
    }

    impl Transport for RecordingTransport {
        fn send_to_connection(&self, connection_id: &str, event: RealtimeEvent) -> Result<(), DeliveryError> {
            if self.unreachable.lock().unwrap().contains(connection_id) {
                return Err(DeliveryError::Closed(connection_id.to_string()));
            }
            self.pushes.lock().unwrap().push(Push::To(connection_id.to_string(), event));
            Ok(())
        }

        fn broadcast(&self, event: RealtimeEvent) -> usize {
            self.pushes.lock().unwrap().push(Push::All(event));
            1
        }

        fn close(&self, connection_id: &str) {
            self.closed.lock().unwrap().push(connection_id.to_string());
        }
    }

    fn setup() -> (Arc<RecordingTransport>, PresenceRegistry) {
        let transport = Arc::new(RecordingTransport::default());
        let registry = PresenceRegistry::new(transport.clone());
        (transport, registry)
    }

    fn broadcast_sets(pushes: &[Push]) -> Vec<Vec<String>> {
        pushes
            .iter()
            .filter_map(|push| match push {
                Push::All(event) if event.event_type == EventType::GetOnlineUsers => {
                    Some(serde_json::from_value(event.payload.clone()).unwrap())
                }
                _ => None,
            })
            .collect()
    }

    fn direct_pushes(pushes: &[Push]) -> Vec<(String, RealtimeEvent)> {
        pushes
            .iter()
            .filter_map(|push| match push {
                Push::To(id, event) => Some((id.clone(), event.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_two_users_chat_scenario() {
        let (transport, registry) = setup();

        assert_eq!(registry.register_connection(Some("A"), "c1"), Registration::Registered);
        assert_eq!(registry.register_connection(Some("B"), "c2"), Registration::Registered);
        assert_eq!(
            broadcast_sets(&transport.take()),
            vec![vec!["A".to_string()], vec!["A".to_string(), "B".to_string()]]
        );

        let first = Message::new("A".into(), "B".into(), Some("hi B".into()), None);
        assert_eq!(registry.relay_message(&first), RelayOutcome::Delivered("c2".into()));
        let pushes = direct_pushes(&transport.take());
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].0, "c2");
        assert_eq!(pushes[0].1.event_type, EventType::NewMessage);
        let payload: Message = serde_json::from_value(pushes[0].1.payload.clone()).unwrap();
        assert_eq!(payload, first);

        assert_eq!(registry.unregister_connection("c2"), Some("B".to_string()));
        assert_eq!(broadcast_sets(&transport.take()), vec![vec!["A".to_string()]]);

        let second = Message::new("A".into(), "B".into(), Some("still there?".into()), None);
        assert_eq!(registry.relay_message(&second), RelayOutcome::Offline);
        assert!(transport.take().is_empty());
    }

    #[test]
    fn test_reconnect_is_last_write_wins() {
        let (transport, registry) = setup();

        registry.register_connection(Some("A"), "c1");
        let registration = registry.register_connection(Some("A"), "c2");

        assert_eq!(registration, Registration::Replaced { previous_connection: "c1".into() });
        assert_eq!(registry.lookup_connection("A"), Some("c2".to_string()));
        assert_eq!(registry.online_users(), vec!["A".to_string()]);

        let pushes = transport.take();
        assert_eq!(broadcast_sets(&pushes), vec![vec!["A".to_string()], vec!["A".to_string()]]);
        let direct = direct_pushes(&pushes);
        assert_eq!(direct.len(), 1);
        assert_eq!(direct[0].0, "c1");
        assert_eq!(direct[0].1.event_type, EventType::SessionReplaced);
        assert_eq!(transport.closed(), vec!["c1".to_string()]);
    }

    #[test]
    fn test_unreachable_replaced_connection_is_still_closed() {
        let (transport, registry) = setup();

        registry.register_connection(Some("A"), "c1");
        transport.make_unreachable("c1");
        let registration = registry.register_connection(Some("A"), "c2");

        assert_eq!(registration, Registration::Replaced { previous_connection: "c1".into() });
        assert_eq!(transport.closed(), vec!["c1".to_string()]);
        assert_eq!(registry.lookup_connection("A"), Some("c2".to_string()));
        assert!(direct_pushes(&transport.take()).is_empty());
    }

    #[test]
    fn test_closing_replaced_connection_keeps_newer_one() {
        let (transport, registry) = setup();

        registry.register_connection(Some("A"), "c1");
        registry.register_connection(Some("A"), "c2");
        transport.take();

        assert_eq!(registry.unregister_connection("c1"), None);
        assert_eq!(registry.lookup_connection("A"), Some("c2".to_string()));
        assert!(transport.take().is_empty());
    }

    #[test]
    fn test_unregister_unknown_connection_is_silent() {
        let (transport, registry) = setup();
        registry.register_connection(Some("A"), "c1");
        transport.take();

        assert_eq!(registry.unregister_connection("nope"), None);
        assert_eq!(registry.unregister_connection("c1"), Some("A".to_string()));
        assert_eq!(registry.unregister_connection("c1"), None);

        assert_eq!(broadcast_sets(&transport.take()), vec![Vec::<String>::new()]);
    }

    #[test]
    fn test_anonymous_connection_gets_snapshot_but_is_not_registered() {
        let (transport, registry) = setup();
        registry.register_connection(Some("A"), "c1");
        transport.take();

        assert_eq!(registry.register_connection(None, "c9"), Registration::Anonymous);
        assert_eq!(registry.register_connection(Some(""), "c10"), Registration::Anonymous);

        assert_eq!(registry.online_users(), vec!["A".to_string()]);
        assert_eq!(
            broadcast_sets(&transport.take()),
            vec![vec!["A".to_string()], vec!["A".to_string()]]
        );
        assert_eq!(registry.unregister_connection("c9"), None);
    }

    #[test]
    fn test_connection_reused_by_another_user() {
        let (_transport, registry) = setup();
        registry.register_connection(Some("A"), "c1");
        registry.register_connection(Some("B"), "c1");

        assert_eq!(registry.online_users(), vec!["B".to_string()]);
        assert_eq!(registry.lookup_connection("A"), None);
        assert_eq!(registry.unregister_connection("c1"), Some("B".to_string()));
        assert!(registry.online_users().is_empty());
    }

    #[test]
    fn test_unregister_user_evicts_and_rebroadcasts() {
        let (transport, registry) = setup();
        registry.register_connection(Some("A"), "c1");
        registry.register_connection(Some("B"), "c2");
        transport.take();

        assert_eq!(registry.unregister_user("A"), Some("c1".to_string()));
        assert_eq!(registry.unregister_user("A"), None);
        assert_eq!(registry.unregister_connection("c1"), None);
        assert_eq!(registry.lookup_connection("A"), None);
        assert_eq!(broadcast_sets(&transport.take()), vec![vec!["B".to_string()]]);
    }

    #[test]
    fn test_relay_failure_is_swallowed() {
        let (transport, registry) = setup();
        registry.register_connection(Some("B"), "c2");
        transport.make_unreachable("c2");

        let message = Message::new("A".into(), "B".into(), Some("hi".into()), None);
        assert_eq!(registry.relay_message(&message), RelayOutcome::Dropped("c2".into()));
    }

    #[test]
    fn test_relay_never_reaches_sender_or_bystanders() {
        let (transport, registry) = setup();
        registry.register_connection(Some("A"), "c1");
        registry.register_connection(Some("B"), "c2");
        registry.register_connection(Some("C"), "c3");
        transport.take();

        let message = Message::new("A".into(), "C".into(), None, Some("https://img/x.png".into()));
        registry.relay_message(&message);

        let pushes = transport.take();
        assert!(broadcast_sets(&pushes).is_empty());
        let targets: Vec<String> = direct_pushes(&pushes).into_iter().map(|(id, _)| id).collect();
        assert_eq!(targets, vec!["c3".to_string()]);
    }

    #[test]
    fn test_independent_registries_do_not_share_state() {
        let (_t1, first) = setup();
        let (_t2, second) = setup();
        first.register_connection(Some("A"), "c1");

        assert_eq!(first.lookup_connection("A"), Some("c1".to_string()));
        assert_eq!(second.lookup_connection("A"), None);
    }
}
