//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::images::ImageError;
use crate::services::{AssistantError, AuthError};
use crate::store::StoreError;

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Chat assistant operation failed.
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    /// Image processing failed.
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Store(_) | Self::Assistant(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Store(err) => match err {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::DuplicateId(_) | StoreError::Invalid(_) => StatusCode::BAD_REQUEST,
                StoreError::Http(_) | StoreError::Api { .. } | StoreError::BadRecord(_) => {
                    StatusCode::BAD_GATEWAY
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::EmailNotConfirmed
                | AuthError::InvalidRegistrationCode => StatusCode::UNAUTHORIZED,
                AuthError::RegistrationUnavailable => StatusCode::FORBIDDEN,
                AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Assistant(_) => StatusCode::BAD_GATEWAY,
            Self::Image(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(err) => match err {
                StoreError::NotFound(_) => "Item não encontrado".to_string(),
                StoreError::DuplicateId(_) | StoreError::Invalid(_) => err.to_string(),
                _ => "Erro interno do servidor".to_string(),
            },
            Self::Auth(err) => err.user_message().to_string(),
            Self::Assistant(_) | Self::Internal(_) => "Erro interno do servidor".to_string(),
            Self::Image(err) => err.to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use jangada_core::MenuItemId;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("item".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("admin".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("missing field".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_not_found_maps_to_404() {
        let err = AppError::Store(StoreError::NotFound(MenuItemId::new("42")));
        assert_eq!(get_status(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_auth_errors_map_to_401() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidRegistrationCode)),
            StatusCode::UNAUTHORIZED
        );
    }
}
