//! Unified error handling for admin.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use jungle_storefront::db::RepositoryError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Every admin error is a server error: report it, hide the details
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Admin request error"
        );

        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Database(RepositoryError::Conflict(
            "category name already exists".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "Database error: constraint violation: category name already exists"
        );
    }

    #[tokio::test]
    async fn test_database_error_is_opaque_500() {
        let response =
            AppError::Database(RepositoryError::Conflict("x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Internal server error");
    }
}
