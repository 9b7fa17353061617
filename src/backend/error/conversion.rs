/**
 * Error Conversion
 *
 * This module provides the `IntoResponse` implementation for backend errors,
 * allowing handlers to return `Result<_, BackendError>` directly.
 *
 * # Response Format
 *
 * Error responses are returned as JSON with the following structure:
 * ```json
 * {
 *   "message": "All fields are required",
 *   "status": 400
 * }
 * ```
 */
use axum::response::{IntoResponse, Json, Response};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("[Server] {} -> {}", self, status);
        } else {
            tracing::debug!("[Server] Rejected request: {} ({})", message, status);
        }

        let body = serde_json::json!({
            "message": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
