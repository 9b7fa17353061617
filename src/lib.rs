//! duetchat - Main Library
//!
//! duetchat is a two-person direct-messaging backend built with Rust. Users
//! sign up, log in, edit their profile, disable or delete their account, and
//! exchange messages that are persisted first and then pushed live to the
//! recipient when they hold an open realtime connection.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between the server and any client
//!   - Message and user payloads, realtime event envelopes
//!   - Error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server and routes
//!   - Presence registry and message relay
//!   - Authentication, accounts, media upload
//!   - SQLite persistence
//!
//! # Feature Flags
//!
//! - **`ssr`** - Server build (enabled by default)
//!
//! # Usage
//!
//! ```rust,no_run
//! use duetchat::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! let app = create_app(&config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The presence registry and connection hub guard their maps with
//! `std::sync::Mutex` and never hold a lock across an `.await`. Everything
//! in `AppState` is cheap to clone and `Send + Sync`.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
