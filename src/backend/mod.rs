//! Backend Module
//!
//! This module contains all server-side code for duetchat: an Axum HTTP
//! server with session auth, SQLite persistence, and a live message relay
//! driven by the presence registry.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Accounts, JWT sessions, password hashing
//! - **`middleware`** - Route guard and the `AuthUser` extractor
//! - **`messaging`** - Message persistence and the conversation API
//! - **`presence`** - Who is online and where to reach them
//! - **`realtime`** - Connection hub and the SSE endpoint
//! - **`media`** - Image uploads to the asset host
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication and accounts
//! ├── middleware/     - Request middleware
//! ├── messaging/      - Messages
//! ├── presence/       - Presence registry and relay
//! ├── realtime/       - SSE connections
//! ├── media/          - Image uploads
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the SQLite pool, the presence registry, the connection
//! hub, auth settings and the media uploader. Each service sits behind an
//! `Arc`, so cloning the state per request is cheap.
//!
//! # Delivery Guarantee
//!
//! `POST /api/messages/send/{id}` awaits the insert before relaying. A live
//! push is best effort; the database is the source of truth and clients
//! recover anything they missed by refetching the conversation.
//!
//! # Error Handling
//!
//! Handlers return `Result<_, BackendError>`. Client errors carry their own
//! status and message; internal failures are logged and reported as a
//! generic 500.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Direct messages
pub mod messaging;

/// Presence registry and message relay
pub mod presence;

/// Real-time connections
pub mod realtime;

/// Image uploads
pub mod media;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::BackendError;
pub use presence::PresenceRegistry;
pub use realtime::{handle_realtime_subscription, ConnectionHub};
pub use server::{create_app, AppState, ServerConfig};
