//! Review service.

use serde::{Deserialize, Serialize};

use bookstore_core::{BookId, Rating, Review, ReviewId, UserId};

use super::{ServiceError, required, today};
use crate::db::{Gateway, Sequence};

/// Raw review form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewDraft {
    pub book_id: Option<BookId>,
    /// Stars, 1 when omitted.
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

/// A review joined with the title of the book it refers to.
///
/// `title` is `None` when the book has since been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewWithTitle {
    #[serde(flatten)]
    pub review: Review,
    pub title: Option<String>,
}

/// Review operations for one request.
pub struct ReviewService<'a> {
    gateway: &'a dyn Gateway,
}

impl<'a> ReviewService<'a> {
    #[must_use]
    pub const fn new(gateway: &'a dyn Gateway) -> Self {
        Self { gateway }
    }

    /// Reviews of any of `book_ids`, each with its book's current title.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if the gateway fails.
    pub async fn list_reviews(
        &self,
        book_ids: &[BookId],
    ) -> Result<Vec<ReviewWithTitle>, ServiceError> {
        let reviews = self.gateway.list_reviews(book_ids).await?;

        let mut joined = Vec::with_capacity(reviews.len());
        for review in reviews {
            let title = self
                .gateway
                .find_book(review.book_id)
                .await?
                .map(|book| book.title);
            joined.push(ReviewWithTitle { review, title });
        }
        Ok(joined)
    }

    /// Store `user_id`'s review, dated today.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::MissingField` if the book or comment is absent.
    /// Returns `ServiceError::InvalidRating` if the rating is outside 1 to 5.
    pub async fn add_review(
        &self,
        user_id: UserId,
        draft: &ReviewDraft,
    ) -> Result<Review, ServiceError> {
        let book_id = draft.book_id.ok_or(ServiceError::MissingField("book_id"))?;
        let comment = required(draft.comment.as_deref(), "comment")?;
        let rating = draft.rating.map_or(Ok(Rating::default()), Rating::new)?;

        let id = self.gateway.next_id(Sequence::Reviews).await?;
        let review = Review {
            id: ReviewId::new(id),
            book_id,
            user_id,
            rating,
            comment,
            review_date: today(),
        };
        self.gateway.insert_review(&review).await?;

        tracing::info!(review_id = %review.id, book_id = %book_id, rating = %rating, "Review added");
        Ok(review)
    }
}
