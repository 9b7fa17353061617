//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - Route guard that resolves the session to an account
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, Router};
//! use duetchat::backend::middleware::auth_middleware;
//! use duetchat::backend::server::AppState;
//!
//! fn protect(router: Router<AppState>, state: AppState) -> Router<AppState> {
//!     router.route_layer(middleware::from_fn_with_state(state, auth_middleware))
//! }
//! ```

pub mod auth;

pub use auth::{auth_middleware, resolve_session, AuthUser, AuthenticatedUser};
