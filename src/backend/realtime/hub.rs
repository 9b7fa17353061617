/**
 * Connection Hub
 *
 * Owns the outbound side of every live realtime stream. Each attached
 * connection gets a bounded `tokio::sync::mpsc` channel; the SSE handler
 * holds the receiver and the hub keeps the sender under the connection id.
 *
 * # Delivery
 *
 * Pushes use `try_send`, so a slow client can never block the caller. A
 * full buffer or a receiver that has gone away is reported as a
 * `DeliveryError` and the event is dropped for that connection only.
 *
 * # Lifetime
 *
 * `attach` allocates a fresh UUID v4 connection id. `detach` forgets the
 * sender and is idempotent; the realtime stream calls it from its drop
 * guard when the client disconnects.
 */
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::backend::presence::transport::{DeliveryError, Transport};
use crate::shared::RealtimeEvent;

pub struct ConnectionHub {
    connections: Mutex<HashMap<String, mpsc::Sender<RealtimeEvent>>>,
    buffer: usize,
}

impl ConnectionHub {
    /// Create a hub whose per-connection buffers hold `buffer` events
    ///
    /// A zero buffer is bumped to one, since `mpsc::channel` rejects it.
    pub fn new(buffer: usize) -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
            buffer: buffer.max(1),
        }
    }

    fn connections(&self) -> MutexGuard<'_, HashMap<String, mpsc::Sender<RealtimeEvent>>> {
        self.connections.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach a new connection and hand back its id and event receiver
    pub fn attach(&self) -> (String, mpsc::Receiver<RealtimeEvent>) {
        let connection_id = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(self.buffer);

        let mut connections = self.connections();
        connections.insert(connection_id.clone(), tx);
        tracing::debug!(
            "[Realtime] Attached connection {} ({} live)",
            connection_id,
            connections.len()
        );

        (connection_id, rx)
    }

    /// Forget a connection; a no-op if it is already gone
    pub fn detach(&self, connection_id: &str) -> bool {
        let mut connections = self.connections();
        let removed = connections.remove(connection_id).is_some();
        if removed {
            tracing::debug!(
                "[Realtime] Detached connection {} ({} live)",
                connection_id,
                connections.len()
            );
        }
        removed
    }

    pub fn connection_count(&self) -> usize {
        self.connections().len()
    }
}

fn delivery_error(connection_id: &str, err: TrySendError<RealtimeEvent>) -> DeliveryError {
    match err {
        TrySendError::Full(_) => DeliveryError::Full(connection_id.to_string()),
        TrySendError::Closed(_) => DeliveryError::Closed(connection_id.to_string()),
    }
}

impl Transport for ConnectionHub {
    fn send_to_connection(&self, connection_id: &str, event: RealtimeEvent) -> Result<(), DeliveryError> {
        let connections = self.connections();
        let sender = connections
            .get(connection_id)
            .ok_or_else(|| DeliveryError::UnknownConnection(connection_id.to_string()))?;

        sender
            .try_send(event)
            .map_err(|e| delivery_error(connection_id, e))
    }

    fn broadcast(&self, event: RealtimeEvent) -> usize {
        let connections = self.connections();
        let mut delivered = 0;

        for (connection_id, sender) in connections.iter() {
            match sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        "[Realtime] Skipping {} broadcast: {}",
                        event.event_type.name(),
                        delivery_error(connection_id, e)
                    );
                }
            }
        }

        delivered
    }

    fn close(&self, connection_id: &str) {
        if self.detach(connection_id) {
            tracing::debug!("[Realtime] Closed connection {}", connection_id);
        }
    }
}
