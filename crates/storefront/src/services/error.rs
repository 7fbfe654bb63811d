//! Service error types.

use thiserror::Error;

use bookstore_core::{BookId, PriceError, RatingError};

use crate::db::RepositoryError;

/// Errors returned by the identity, catalog, order and review services.
///
/// The `Display` text of every variant except `StorageUnavailable` is shown
/// to the user as-is.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No user with this ID and role (wrong ID and wrong role look the same).
    #[error("Invalid User ID")]
    InvalidCredentials,

    #[error("User ID already exists. Please choose a different ID.")]
    DuplicateUserId,

    /// The ID entered on the account form is not an integer.
    #[error("Invalid ID. Please enter a numeric value.")]
    InvalidId,

    /// A required input was absent or blank.
    #[error("All fields are required: {0} is missing.")]
    MissingField(&'static str),

    #[error("A book with this title already exists!")]
    DuplicateTitle,

    #[error("Invalid rating: {0}")]
    InvalidRating(#[from] RatingError),

    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    #[error("Book {0} not found")]
    BookNotFound(BookId),

    /// The session's user no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// The gateway failed; the request may be retried.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] RepositoryError),
}

impl ServiceError {
    /// Stable machine-readable name, used as `kind` in error bodies.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::DuplicateUserId => "duplicate_user_id",
            Self::InvalidId => "invalid_id",
            Self::MissingField(_) => "missing_field",
            Self::DuplicateTitle => "duplicate_title",
            Self::InvalidRating(_) => "invalid_rating",
            Self::InvalidPrice(_) => "invalid_price",
            Self::BookNotFound(_) => "book_not_found",
            Self::UserNotFound => "user_not_found",
            Self::StorageUnavailable(_) => "storage_unavailable",
        }
    }
}
