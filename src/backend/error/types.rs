/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP responses.
 *
 * # Error Types
 *
 * - `HandlerError` - A request was rejected with an explicit status and message
 * - `Database` - A query failed
 * - `Token` - A session token could not be created
 * - `PasswordHash` - bcrypt failed to hash or verify
 * - `Media` - The asset host rejected an upload or is not configured
 *
 * # Error Categories
 *
 * ## Client Errors
 *
 * Handler and validation errors are reported to the client verbatim:
 * - Missing or invalid fields (400)
 * - Missing or invalid session (401)
 * - Disabled accounts (403)
 * - Unknown users (404)
 *
 * ## Server Errors
 *
 * Database, token, hashing and serialization failures are logged with their
 * cause and reach the client only as "Internal Server Error".
 */
use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::media::MediaError;
use crate::shared::SharedError;

const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use duetchat::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::bad_request("All fields are required");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request rejected with an explicit status
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Session token error
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Password hashing error
    #[error("Password hash error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// Media upload error
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Shared error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    /// 401 Unauthorized
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    /// 403 Forbidden
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `Media` - 503 when uploads are not configured, 502 otherwise
    /// - `SharedError` - 400 for validation, 500 for serialization
    /// - everything else - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Media(err) => err.status_code(),
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Database(_)
            | Self::Token(_)
            | Self::PasswordHash(_)
            | Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the client
    ///
    /// Internal failures are collapsed to a generic message; the cause is
    /// only logged.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Media(err) => err.public_message().to_string(),
            Self::SharedError(err @ SharedError::ValidationError { .. }) => err.to_string(),
            _ => INTERNAL_MESSAGE.to_string(),
        }
    }
}
