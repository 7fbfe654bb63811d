//! Review route handlers.

use axum::{Json, extract::State, http::StatusCode};

use bookstore_core::{BookId, Capability, Review};

use super::{Envelope, JsonBody};
use crate::error::Result;
use crate::middleware::Navigator;
use crate::services::{ReviewDraft, ReviewWithTitle};
use crate::state::AppState;

/// GET /reviews
///
/// Reviews of every book currently in the catalog.
///
/// # Errors
///
/// Returns `NotAuthenticated` when logged out.
pub async fn index(
    State(state): State<AppState>,
    navigator: Navigator,
) -> Result<Json<Envelope<Vec<ReviewWithTitle>>>> {
    navigator.require(Capability::ReadReviews)?;

    let book_ids: Vec<BookId> = state
        .catalog()
        .list()
        .await?
        .into_iter()
        .map(|book| book.id)
        .collect();
    let reviews = state.reviews().list_reviews(&book_ids).await?;

    let mut body = Envelope::new(reviews, &navigator);
    if body.data.is_empty() {
        body = body.with_message("No reviews available.");
    }
    Ok(Json(body))
}

/// POST /reviews
///
/// # Errors
///
/// Returns `Forbidden` unless the role writes reviews, `MissingField` for an
/// absent book or comment and `InvalidRating` outside 1 to 5.
pub async fn create(
    State(state): State<AppState>,
    navigator: Navigator,
    JsonBody(draft): JsonBody<ReviewDraft>,
) -> Result<(StatusCode, Json<Envelope<Review>>)> {
    let user = navigator.require(Capability::WriteReviews)?;

    let review = state.reviews().add_review(user.id, &draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(review, &navigator).with_message("Review added successfully!")),
    ))
}
