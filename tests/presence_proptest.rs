//! Property-based tests for the presence registry
//!
//! Random sequences of connects, disconnects, evictions and relays are run
//! against the registry and a plain model of the user <-> connection index.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use duetchat::backend::presence::{DeliveryError, PresenceRegistry, Registration, RelayOutcome, Transport};
use duetchat::shared::{EventType, Message, RealtimeEvent};

#[derive(Debug, Clone)]
enum Push {
    To(String, RealtimeEvent),
    All(RealtimeEvent),
}

#[derive(Default)]
struct Recorder {
    pushes: Mutex<Vec<Push>>,
}

impl Recorder {
    fn take(&self) -> Vec<Push> {
        std::mem::take(&mut *self.pushes.lock().unwrap())
    }
}

impl Transport for Recorder {
    fn send_to_connection(&self, connection_id: &str, event: RealtimeEvent) -> Result<(), DeliveryError> {
        self.pushes.lock().unwrap().push(Push::To(connection_id.to_string(), event));
        Ok(())
    }

    fn broadcast(&self, event: RealtimeEvent) -> usize {
        self.pushes.lock().unwrap().push(Push::All(event));
        1
    }

    fn close(&self, _connection_id: &str) {}
}

#[derive(Debug, Clone)]
enum Op {
    Register(Option<u8>, u8),
    UnregisterConnection(u8),
    UnregisterUser(u8),
    Relay(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (proptest::option::weighted(0.85, 0u8..4), 0u8..6).prop_map(|(u, c)| Op::Register(u, c)),
        2 => (0u8..6).prop_map(Op::UnregisterConnection),
        1 => (0u8..4).prop_map(Op::UnregisterUser),
        1 => (0u8..4).prop_map(Op::Relay),
    ]
}

fn user(n: u8) -> String {
    format!("user-{}", n)
}

fn conn(n: u8) -> String {
    format!("conn-{}", n)
}

#[derive(Default)]
struct Model {
    by_user: BTreeMap<String, String>,
    by_connection: BTreeMap<String, String>,
}

impl Model {
    fn online(&self) -> Vec<String> {
        self.by_user.keys().cloned().collect()
    }
}

fn only_broadcast(pushes: &[Push], expected_online: &[String]) -> Result<(), TestCaseError> {
    prop_assert_eq!(pushes.len(), 1);
    match &pushes[0] {
        Push::All(event) => {
            prop_assert_eq!(event.event_type, EventType::GetOnlineUsers);
            prop_assert_eq!(&event.payload, &serde_json::json!(expected_online));
        }
        other => prop_assert!(false, "expected a broadcast, got {:?}", other),
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_registry_matches_model(ops in proptest::collection::vec(op(), 1..60)) {
        let recorder = Arc::new(Recorder::default());
        let registry = PresenceRegistry::new(recorder.clone());
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Register(None, c) => {
                    prop_assert_eq!(registry.register_connection(None, &conn(c)), Registration::Anonymous);
                    only_broadcast(&recorder.take(), &model.online())?;
                }
                Op::Register(Some(u), c) => {
                    let (u, c) = (user(u), conn(c));
                    if let Some(stale) = model.by_connection.remove(&c) {
                        if stale != u {
                            model.by_user.remove(&stale);
                        }
                    }
                    let previous = model.by_user.insert(u.clone(), c.clone());
                    model.by_connection.insert(c.clone(), u.clone());

                    let registration = registry.register_connection(Some(&u), &c);
                    let mut pushes = recorder.take();
                    match previous {
                        Some(previous) if previous != c => {
                            model.by_connection.remove(&previous);
                            prop_assert_eq!(
                                registration,
                                Registration::Replaced { previous_connection: previous.clone() }
                            );
                            let notice = pushes.remove(0);
                            match notice {
                                Push::To(target, event) => {
                                    prop_assert_eq!(target, previous);
                                    prop_assert_eq!(event.event_type, EventType::SessionReplaced);
                                }
                                other => prop_assert!(false, "expected sessionReplaced, got {:?}", other),
                            }
                        }
                        _ => prop_assert_eq!(registration, Registration::Registered),
                    }
                    only_broadcast(&pushes, &model.online())?;
                }
                Op::UnregisterConnection(c) => {
                    let c = conn(c);
                    let expected = model.by_connection.remove(&c);
                    if let Some(u) = &expected {
                        model.by_user.remove(u);
                    }
                    prop_assert_eq!(registry.unregister_connection(&c), expected.clone());
                    let pushes = recorder.take();
                    if expected.is_some() {
                        only_broadcast(&pushes, &model.online())?;
                    } else {
                        prop_assert!(pushes.is_empty());
                    }
                }
                Op::UnregisterUser(u) => {
                    let u = user(u);
                    let expected = model.by_user.remove(&u);
                    if let Some(c) = &expected {
                        model.by_connection.remove(c);
                    }
                    prop_assert_eq!(registry.unregister_user(&u), expected.clone());
                    let pushes = recorder.take();
                    if expected.is_some() {
                        only_broadcast(&pushes, &model.online())?;
                    } else {
                        prop_assert!(pushes.is_empty());
                    }
                }
                Op::Relay(u) => {
                    let message = Message::new("sender".into(), user(u), Some("hi".into()), None);
                    let outcome = registry.relay_message(&message);
                    let pushes = recorder.take();
                    match model.by_user.get(&user(u)) {
                        Some(c) => {
                            prop_assert_eq!(outcome, RelayOutcome::Delivered(c.clone()));
                            prop_assert_eq!(pushes.len(), 1);
                            match &pushes[0] {
                                Push::To(target, event) => {
                                    prop_assert_eq!(target, c);
                                    prop_assert_eq!(event.event_type, EventType::NewMessage);
                                }
                                other => prop_assert!(false, "expected a direct push, got {:?}", other),
                            }
                        }
                        None => {
                            prop_assert_eq!(outcome, RelayOutcome::Offline);
                            prop_assert!(pushes.is_empty());
                        }
                    }
                }
            }

            // Index stays a bijection and matches the model.
            prop_assert_eq!(registry.online_users(), model.online());
            for (u, c) in &model.by_user {
                prop_assert_eq!(registry.lookup_connection(u), Some(c.clone()));
                prop_assert_eq!(model.by_connection.get(c), Some(u));
            }
            prop_assert_eq!(model.by_user.len(), model.by_connection.len());
        }
    }
}
