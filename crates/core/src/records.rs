//! Persisted record shapes.
//!
//! Field names follow the collection wire contract (`UserID`, `title`,
//! `OrderDate`, ...), so these types serialize exactly as the stored
//! documents do. Dates travel as `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{BookId, OrderId, OrderStatus, Price, Rating, ReviewId, UserId, UserType};

/// A customer or admin account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "UserID")]
    pub id: UserId,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "UserType")]
    pub user_type: UserType,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "BookID")]
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub price: Price,
    pub genre: String,
    pub published_year: i32,
    pub publisher: String,
}

/// A validated book that has not been assigned an ID yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub price: Price,
    pub genre: String,
    pub published_year: i32,
    pub publisher: String,
}

impl NewBook {
    /// Attach an ID, producing the record to insert.
    #[must_use]
    pub fn with_id(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            price: self.price,
            genre: self.genre,
            published_year: self.published_year,
            publisher: self.publisher,
        }
    }
}

/// A single-book purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "OrderID")]
    pub id: OrderId,
    #[serde(rename = "UserID")]
    pub user_id: UserId,
    #[serde(rename = "BookID")]
    pub book_id: BookId,
    #[serde(rename = "OrderDate")]
    pub order_date: NaiveDate,
    #[serde(rename = "Price")]
    pub price: Price,
    #[serde(rename = "OrderStatus")]
    pub status: OrderStatus,
}

/// A customer's rating and comment on a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "ReviewID")]
    pub id: ReviewId,
    #[serde(rename = "BookID")]
    pub book_id: BookId,
    #[serde(rename = "UserID")]
    pub user_id: UserId,
    #[serde(rename = "Rating")]
    pub rating: Rating,
    #[serde(rename = "Comment")]
    pub comment: String,
    #[serde(rename = "ReviewDate")]
    pub review_date: NaiveDate,
}

/// Book attribute a catalog search can match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    #[default]
    Genre,
    Author,
    Publisher,
}

impl SearchField {
    /// The stored field name, which is also the column name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Genre => "genre",
            Self::Author => "author",
            Self::Publisher => "publisher",
        }
    }

    /// Borrow the matching attribute of `book`.
    #[must_use]
    pub fn value_of<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            Self::Genre => &book.genre,
            Self::Author => &book.author,
            Self::Publisher => &book.publisher,
        }
    }

    /// Case-insensitive substring match of `term` against this field of `book`.
    ///
    /// The term is literal text; an empty term matches every book.
    #[must_use]
    pub fn matches(&self, book: &Book, term: &str) -> bool {
        self.value_of(book)
            .to_lowercase()
            .contains(&term.to_lowercase())
    }
}
