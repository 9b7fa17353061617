//! Presence Module
//!
//! Tracks which users are online and where to reach them.
//!
//! # Architecture
//!
//! - **`registry`** - `PresenceRegistry`: user <-> connection index,
//!   online-set broadcasts and the live message relay
//! - **`transport`** - `Transport` trait the registry pushes through
//! - **`handlers`** - `GET /api/presence`
//!
//! # Module Structure
//!
//! ```text
//! presence/
//! ├── mod.rs       - Module exports and documentation
//! ├── registry.rs  - Presence registry and message relay
//! ├── transport.rs - Push primitives and delivery errors
//! └── handlers.rs  - Online-set HTTP endpoint
//! ```
//!
//! # Lifecycle
//!
//! 1. A realtime stream opens: the hub attaches a connection and the
//!    registry maps the authenticated user to it, then broadcasts
//!    `getOnlineUsers`.
//! 2. A message is persisted: `relay_message` pushes `newMessage` to the
//!    receiver's connection if they are online.
//! 3. The stream drops: the registry unmaps the connection and rebroadcasts.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use duetchat::backend::presence::PresenceRegistry;
//! use duetchat::backend::realtime::ConnectionHub;
//!
//! let hub = Arc::new(ConnectionHub::new(16));
//! let registry = PresenceRegistry::new(hub.clone());
//!
//! let (connection_id, _events) = hub.attach();
//! registry.register_connection(Some("user-1"), &connection_id);
//! assert_eq!(registry.online_users(), vec!["user-1".to_string()]);
//! ```

/// Presence registry and message relay
pub mod registry;

/// Transport contract
pub mod transport;

/// Online-set HTTP endpoint
pub mod handlers;

pub use handlers::get_online_users;
pub use registry::{PresenceRegistry, Registration, RelayOutcome};
pub use transport::{DeliveryError, Transport};
