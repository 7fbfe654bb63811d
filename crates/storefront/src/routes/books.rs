//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use bookstore_core::{Book, BookId, Capability, SearchField, policy};

use super::{Envelope, JsonBody};
use crate::error::{AppError, Result};
use crate::middleware::Navigator;
use crate::services::BookDraft;
use crate::state::AppState;

/// Catalog query string.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub term: Option<String>,
    #[serde(default)]
    pub field: SearchField,
}

/// GET /books?term=&field=
///
/// Customers browse to order; admins browse to manage. Without a term (or
/// with an empty one) the whole catalog is listed.
///
/// # Errors
///
/// Returns `NotAuthenticated` when logged out.
pub async fn index(
    State(state): State<AppState>,
    navigator: Navigator,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Envelope<Vec<Book>>>> {
    let user = navigator.require_user()?;
    let entry = policy(user.role);
    if !(entry.can(Capability::BrowseCatalog) || entry.can(Capability::ManageBooks)) {
        return Err(AppError::Forbidden(Capability::BrowseCatalog));
    }

    let term = query.term.unwrap_or_default();
    let books = state.catalog().search(&term, query.field).await?;

    let mut body = Envelope::new(books, &navigator);
    if body.data.is_empty() && !term.is_empty() {
        body = body.with_message("No books found.");
    }
    Ok(Json(body))
}

/// POST /books
///
/// # Errors
///
/// Returns `Forbidden` unless the role manages books, `MissingField` or
/// `InvalidPrice` for bad input and `DuplicateTitle` for a known title.
pub async fn create(
    State(state): State<AppState>,
    navigator: Navigator,
    JsonBody(draft): JsonBody<BookDraft>,
) -> Result<(StatusCode, Json<Envelope<Book>>)> {
    navigator.require(Capability::ManageBooks)?;

    let book = state.catalog().add_book(&draft).await?;
    let message = format!("Book '{}' added successfully!", book.title);
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(book, &navigator).with_message(message)),
    ))
}

/// DELETE /books/{id}
///
/// # Errors
///
/// Returns `Forbidden` unless the role manages books and `BookNotFound` when
/// no book has this ID.
pub async fn destroy(
    State(state): State<AppState>,
    navigator: Navigator,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<BookId>>> {
    navigator.require(Capability::ManageBooks)?;

    let id = BookId::new(id);
    state.catalog().delete_book(id).await?;
    Ok(Json(
        Envelope::new(id, &navigator).with_message("Book deleted successfully!"),
    ))
}
