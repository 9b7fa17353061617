//! Authentication Handlers Module
//!
//! HTTP handlers for the auth and account endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types, field rules
//! ├── signup.rs   - User registration
//! ├── login.rs    - Login and logout
//! ├── me.rs       - Current user
//! ├── profile.rs  - Profile update and deletion
//! └── account.rs  - Disable and enable
//! ```
//!
//! # Handlers
//!
//! - **`signup`** - POST /api/auth/signup
//! - **`login`** - POST /api/auth/login
//! - **`logout`** - POST /api/auth/logout
//! - **`check_auth`** - GET /api/auth/check (guarded)
//! - **`update_profile`** - PUT /api/auth/update-profile (guarded)
//! - **`delete_profile`** - DELETE /api/auth/delete-profile (guarded)
//! - **`disable_account`** - PUT /api/auth/disable-account (guarded)
//! - **`enable_account`** - PUT /api/auth/enable-account
//!
//! # Authentication Flow
//!
//! 1. **Signup**: fields validated, account created, session cookie set
//! 2. **Login**: credentials verified, session cookie set
//! 3. **Guarded routes**: cookie or bearer token verified by the middleware

/// Request and response types
pub mod types;

/// Signup handler
pub mod signup;

/// Login and logout handlers
pub mod login;

/// Current user handler
pub mod me;

/// Profile update and deletion handlers
pub mod profile;

/// Disable and enable handlers
pub mod account;

pub use account::{disable_account, enable_account};
pub use login::{login, logout};
pub use me::check_auth;
pub use profile::{delete_profile, update_profile};
pub use signup::signup;
pub use types::{AccountResponse, AuthResponse, LoginRequest, MessageResponse, SignupRequest};
