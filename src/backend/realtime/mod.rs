//! Real-time Update Module
//!
//! Server-Sent Events transport for presence broadcasts and live messages.
//!
//! # Architecture
//!
//! - **`hub`** - `ConnectionHub`: one bounded outbound channel per open
//!   stream; implements the presence `Transport`
//! - **`subscription`** - `GET /api/realtime` SSE handler
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── hub.rs          - Connection hub
//! └── subscription.rs - SSE subscription handler
//! ```
//!
//! # Event Types
//!
//! - `getOnlineUsers` - sorted array of online user ids, sent to everyone
//! - `newMessage` - a persisted message, sent to its receiver only
//! - `sessionReplaced` - the user connected again elsewhere; last event on
//!   the old stream

/// Per-connection outbound channels
pub mod hub;

/// Server-Sent Events subscription handler
pub mod subscription;

pub use hub::ConnectionHub;
pub use subscription::handle_realtime_subscription;
