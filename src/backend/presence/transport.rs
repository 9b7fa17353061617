/**
 * Realtime Transport Contract
 *
 * The presence registry never touches sockets or streams directly. It talks
 * to a `Transport`, which knows how to push one event to one connection or
 * to every connection. The production implementation is
 * `backend::realtime::hub::ConnectionHub`; tests substitute a recorder.
 *
 * All primitives are synchronous and non-blocking. A push is a local
 * enqueue onto a bounded buffer, never a network round-trip.
 */
use thiserror::Error;

use crate::shared::RealtimeEvent;

/// Why a single push could not be delivered
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// No live connection with this id
    #[error("connection {0} is not attached")]
    UnknownConnection(String),

    /// The connection's outbound buffer is full
    #[error("outbound buffer for connection {0} is full")]
    Full(String),

    /// The connection's receiving side has gone away
    #[error("connection {0} is closed")]
    Closed(String),
}

/// Push primitives supplied by the transport layer
pub trait Transport: Send + Sync {
    /// Push `event` to exactly one connection
    fn send_to_connection(&self, connection_id: &str, event: RealtimeEvent) -> Result<(), DeliveryError>;

    /// Push `event` to every attached connection
    ///
    /// Returns the number of connections that accepted it.
    fn broadcast(&self, event: RealtimeEvent) -> usize;

    /// Stop accepting events for `connection_id`
    ///
    /// Events already queued are still delivered, then the stream ends.
    /// Closing an unknown connection is a no-op.
    fn close(&self, connection_id: &str);
}
