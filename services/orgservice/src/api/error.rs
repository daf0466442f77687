//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every organization
//! endpoint reports failures with the same shape.
//!
//! # Key invariants and assumptions
//! - Error responses carry a stable `code` and a human-readable `message`.
//! - Status codes align with the error category: missing resources are 404,
//!   duplicates and failed preconditions are 409, bad input is 400.
//!
//! # Security considerations
//! - Internal errors log details server-side but return generic messages.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use orgservice::api::error::ApiError;
/// use orgservice::api::types::ErrorResponse;
///
/// let err = ApiError {
///     status: StatusCode::NOT_FOUND,
///     body: ErrorResponse {
///         code: "not_found".to_string(),
///         message: "Organisation not found".to_string(),
///         request_id: None,
///     },
/// };
/// assert_eq!(err.status, StatusCode::NOT_FOUND);
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}

/// Build a 404 Not Found error.
pub fn api_not_found(message: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "not_found", message)
}

/// Build a 409 Conflict error with a caller-provided code.
///
/// `already_exists` marks duplicates, `failed_precondition` marks writes the
/// current state does not allow.
pub fn api_conflict(code: &str, message: &str) -> ApiError {
    api_error(StatusCode::CONFLICT, code, message)
}

/// Build a 400 Bad Request validation error.
pub fn api_validation_error(message: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

/// Build a 500 Internal Server Error from a store error.
///
/// Logs the store error and returns the generic `message` to the client.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "orgservice storage error");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

/// Translate a store failure into its HTTP response.
///
/// `context` is only reported for unexpected failures; every other variant
/// carries a message meant for the caller.
pub fn api_store_error(context: &str, err: StoreError) -> ApiError {
    match err {
        StoreError::OrganizationNotFound => api_not_found("Organisation not found"),
        StoreError::DomainNotFound => api_not_found("domain doesn't exist on organization"),
        StoreError::NotFound(what) => api_not_found(&format!("{what} not found")),
        StoreError::AlreadyExists(message) => api_conflict("already_exists", &message),
        StoreError::Conflict(message) => api_conflict("failed_precondition", &message),
        StoreError::Validation(message) => api_validation_error(&message),
        err @ StoreError::Unexpected(_) => api_internal(context, &err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_helpers_build_expected_codes() {
        let not_found = api_not_found("missing");
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.body.code, "not_found");

        let conflict = api_conflict("already_exists", "conflict");
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert_eq!(conflict.body.code, "already_exists");

        let validation = api_validation_error("bad");
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert_eq!(validation.body.code, "validation_error");
    }

    #[test]
    fn store_errors_map_to_statuses() {
        let cases = [
            (StoreError::OrganizationNotFound, StatusCode::NOT_FOUND, "not_found"),
            (StoreError::DomainNotFound, StatusCode::NOT_FOUND, "not_found"),
            (
                StoreError::NotFound("metadata key".into()),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                StoreError::AlreadyExists("dup".into()),
                StatusCode::CONFLICT,
                "already_exists",
            ),
            (
                StoreError::Conflict("inactive".into()),
                StatusCode::CONFLICT,
                "failed_precondition",
            ),
            (
                StoreError::Validation("empty".into()),
                StatusCode::BAD_REQUEST,
                "validation_error",
            ),
        ];
        for (err, status, code) in cases {
            let api = api_store_error("failed", err);
            assert_eq!(api.status, status);
            assert_eq!(api.body.code, code);
        }
    }

    #[test]
    fn not_found_messages_name_the_missing_object() {
        let org = api_store_error("failed", StoreError::OrganizationNotFound);
        assert!(org.body.message.contains("Organisation not found"));
        let domain = api_store_error("failed", StoreError::DomainNotFound);
        assert_eq!(domain.body.message, "domain doesn't exist on organization");
        let key = api_store_error("failed", StoreError::NotFound("metadata key k3".into()));
        assert_eq!(key.body.message, "metadata key k3 not found");
    }

    #[test]
    fn unexpected_store_errors_hide_details() {
        let err = StoreError::Unexpected(anyhow::anyhow!("boom"));
        let api = api_store_error("storage failed", err);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.body.code, "internal");
        assert_eq!(api.body.message, "storage failed");
    }
}
