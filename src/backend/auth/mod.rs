//! Authentication Module
//!
//! This module handles user registration, sessions and the account
//! lifecycle.
//!
//! # Architecture
//!
//! - **`users`** - Account rows and their queries
//! - **`sessions`** - JWT tokens and the `jwt` cookie
//! - **`password`** - bcrypt hashing
//! - **`handlers`** - HTTP handlers for the auth endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and database operations
//! ├── sessions.rs     - JWT token management
//! ├── password.rs     - Password hashing
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt; the hash never leaves the backend
//! - Sessions are HS256 JWTs carried in an HttpOnly, SameSite=Strict cookie
//! - Tokens expire after the configured number of days (7 by default)
//! - Disabling or deleting an account also drops it from the online set

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// Password hashing
pub mod password;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{
    check_auth, delete_profile, disable_account, enable_account, login, logout, signup, update_profile,
};
pub use sessions::AuthSettings;
