//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server faults to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>` and read bodies through
//! [`JsonBody`](crate::routes::JsonBody), so the body of every error,
//! malformed input included, is `{"kind": ..., "message": ...}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use bookstore_core::{Capability, NavigationError};

use crate::services::ServiceError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A service rejected the request or the store failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The navigator refused the transition.
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// The logged-in role lacks a capability.
    #[error("Your account cannot do this ({0:?})")]
    Forbidden(Capability),

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The request body is not the JSON the route expects.
    #[error("Bad request: {0}")]
    BadRequest(#[from] JsonRejection),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

impl AppError {
    /// Faults on our side; reported to Sentry, details hidden from clients.
    const fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::Service(ServiceError::StorageUnavailable(_)) | Self::Session(_) | Self::Internal(_)
        )
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(err) => match err {
                ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                ServiceError::DuplicateUserId | ServiceError::DuplicateTitle => {
                    StatusCode::CONFLICT
                }
                ServiceError::InvalidId
                | ServiceError::MissingField(_)
                | ServiceError::InvalidRating(_)
                | ServiceError::InvalidPrice(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ServiceError::BookNotFound(_) | ServiceError::UserNotFound => {
                    StatusCode::NOT_FOUND
                }
                ServiceError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::Navigation(err) => match err {
                NavigationError::NotAuthenticated => StatusCode::UNAUTHORIZED,
                NavigationError::AlreadyAuthenticated | NavigationError::RoleNotSelected => {
                    StatusCode::CONFLICT
                }
                NavigationError::ViewNotAllowed { .. } => StatusCode::FORBIDDEN,
            },
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            // 400 for broken JSON, 415 without a JSON content type, 422 for
            // a well-formed body of the wrong shape.
            Self::BadRequest(rejection) => rejection.status(),
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Service(err) => err.kind(),
            Self::Navigation(err) => match err {
                NavigationError::NotAuthenticated => "not_authenticated",
                NavigationError::AlreadyAuthenticated => "already_authenticated",
                NavigationError::RoleNotSelected => "role_not_selected",
                NavigationError::ViewNotAllowed { .. } => "view_not_allowed",
            },
            Self::Forbidden(_) => "forbidden",
            Self::Session(_) => "session",
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Service(ServiceError::StorageUnavailable(_)) => {
                "The bookstore is temporarily unavailable. Please try again.".to_owned()
            }
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_owned(),
            _ => self.to_string(),
        };

        let body = ErrorBody {
            kind: self.kind(),
            message,
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, username: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: username.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
