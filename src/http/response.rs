use crate::utils::error::FormError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub const SAVED_MESSAGE: &str = "Data saved successfully";
pub const FAILURE_MESSAGE: &str = "Failed to process the request";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
pub const NOT_FOUND_MESSAGE: &str = "Not Found";

pub fn status_for(err: &FormError) -> StatusCode {
    match err {
        FormError::AuthMismatch => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The one place handler errors become HTTP responses.
///
/// Callers only ever see a fixed message; the cause stays in the server log.
pub fn error_response(context: &str, err: &FormError) -> Response {
    let status = status_for(err);
    match err {
        FormError::AuthMismatch => {
            tracing::warn!("🔒 Rejected {}: shared secret missing or mismatched", context);
            (status, UNAUTHORIZED_MESSAGE).into_response()
        }
        other => {
            tracing::error!("❌ Error processing {}: {}", context, other);
            (status, FAILURE_MESSAGE).into_response()
        }
    }
}

pub fn not_found_response() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_auth_mismatch_is_not_a_server_error() {
        assert_eq!(status_for(&FormError::AuthMismatch), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(&FormError::NoBody), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            status_for(&FormError::storage_list("offline")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&FormError::delivery("timeout")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_response_hides_cause() {
        let response = error_response("POST request", &FormError::storage_write("data-1", "disk full"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
