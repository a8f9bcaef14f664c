//! Crate-wide failure taxonomy and its HTTP mapping.
//!
//! Handlers return `Result<T, Error>`; the `IntoResponse` impl turns each
//! variant into a distinct status code and a JSON body of the shape
//! `{"error": ..., "code": ...}`. Nothing is retried internally; every
//! variant is terminal for the current request.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// No identity could be resolved from the request.
    #[error("authentication required")]
    Unauthenticated,

    /// The caller is authenticated but the role check failed. Raised before
    /// any data is read, so it never discloses whether a record exists.
    #[error("insufficient permissions")]
    Forbidden,

    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// The referenced record is absent from the registry.
    #[error("{what} not found")]
    NotFound { what: &'static str },

    /// The upstream blob-storage step failed; propagated, not retried.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Persistence-layer failure. The sqlx detail is logged server-side and
    /// never echoed to the client.
    #[error("database failure")]
    Database(#[from] sqlx::Error),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Error::Unauthenticated => "unauthenticated",
            Error::Forbidden => "forbidden",
            Error::Validation(_) => "validation_error",
            Error::NotFound { .. } => "not_found",
            Error::Storage(_) => "storage_failure",
            Error::Database(_) => "database_error",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            // The Display form of Database is generic; log the full chain here.
            tracing::error!(status = %status, error = ?self, "request failed");
        }

        let body = json!({
            "error": self.to_string(),
            "code": self.code(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_produces_401() {
        let response = Error::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn forbidden_produces_403() {
        let response = Error::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn validation_produces_400() {
        let response = Error::validation("title is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_produces_404() {
        let response = Error::NotFound { what: "image" }.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_failure_produces_500() {
        let response = Error::Storage("bucket unreachable".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
