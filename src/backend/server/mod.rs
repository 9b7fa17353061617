//! Server Module
//!
//! This module contains all server-side code for initializing and configuring
//! the Axum HTTP server.
//!
//! # Architecture
//!
//! - **`state`** - Application state structure and `FromRef` implementations
//! - **`config`** - Configuration loading, validation and database setup
//! - **`init`** - State assembly and app creation
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs     - Module exports and documentation
//! ├── state.rs   - AppState and FromRef implementations
//! ├── config.rs  - ServerConfig and connect_database
//! └── init.rs    - build_state and create_app
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: defaults, optional TOML file, environment
//! 2. **Database**: SQLite pool plus embedded migrations
//! 3. **State Creation**: hub, presence registry, auth settings, media
//! 4. **Router Creation**: routes, auth middleware, CORS, tracing
//!
//! # Example
//!
//! ```rust,no_run
//! use duetchat::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! let app = create_app(&config).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::{ConfigError, ServerConfig};
pub use init::{build_state, create_app};
pub use state::AppState;
