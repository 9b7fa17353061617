//! Custom assertion macros
//!
//! Checks on API responses with the body in the failure message.

/// Assert a response status and return the JSON body
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {{
        let response = &$response;
        assert_eq!(
            response.status, $status,
            "unexpected status, body: {:?}",
            response.body
        );
        &response.body
    }};
}

/// Assert an error response with the given status and message
#[macro_export]
macro_rules! assert_error {
    ($response:expr, $status:expr, $message:expr) => {{
        let response = &$response;
        assert_eq!(
            response.status, $status,
            "unexpected status, body: {:?}",
            response.body
        );
        assert_eq!(response.message(), $message);
        assert_eq!(response.body["status"], $status.as_u16());
    }};
}
