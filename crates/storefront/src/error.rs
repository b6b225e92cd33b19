//! Application error types and HTTP response mapping.
//!
//! Handlers return [`AppError`]; the `IntoResponse` impl maps each variant to
//! a status code and a small JSON body, logs server-class errors, and reports
//! them to Sentry. Client-class errors (4xx) are logged at debug only.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;

/// Convenience alias for handler results.
pub type AppResult<T> = Result<T, AppError>;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Payment gateway error: {0}")]
    Payment(String),

    #[error("Not found")]
    NotFound,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Payment(_) => StatusCode::BAD_GATEWAY,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to return to the client. Server-class errors get a
    /// generic message; details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound => {
                "not found".to_owned()
            }
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => "internal server error".to_owned(),
            Self::Payment(_) => "payment gateway unavailable".to_owned(),
            Self::Unauthorized => "authentication required".to_owned(),
            Self::Forbidden => "forbidden".to_owned(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "request failed");
            sentry::capture_error(&self);
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }

        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_not_found_maps_to_404() {
        let err = AppError::from(RepositoryError::NotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_maps_to_409_and_keeps_its_message() {
        let err = AppError::from(RepositoryError::Conflict("duplicate order".to_owned()));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.public_message(), "duplicate order");
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = AppError::Internal("pool exhausted at 10.0.0.5".to_owned());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn ownership_failures_map_to_403() {
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
    }
}
