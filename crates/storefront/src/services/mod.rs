//! Business logic over the [`Gateway`](crate::db::Gateway) port.
//!
//! # Services
//!
//! - [`IdentityService`] - Login by `(UserID, role)`, account creation, profile edits
//! - [`CatalogService`] - Search, add and delete books
//! - [`OrderService`] - Place orders and list them per role
//! - [`ReviewService`] - Submit reviews and list them with book titles
//!
//! Services borrow the gateway for the duration of one request and validate
//! raw input into core types before anything is written.

mod catalog;
mod error;
mod identity;
mod orders;
mod reviews;

pub use catalog::{BookDraft, CatalogService};
pub use error::ServiceError;
pub use identity::{AccountDraft, IdentityService};
pub use orders::OrderService;
pub use reviews::{ReviewDraft, ReviewService, ReviewWithTitle};

use chrono::NaiveDate;

/// Today's date in the server's local time zone.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// `value` verbatim, or `MissingField(name)` when absent or blank.
fn required(value: Option<&str>, name: &'static str) -> Result<String, ServiceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_owned()),
        _ => Err(ServiceError::MissingField(name)),
    }
}
