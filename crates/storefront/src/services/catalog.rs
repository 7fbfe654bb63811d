//! Catalog service: search, add and delete books.

use rust_decimal::Decimal;
use serde::Deserialize;

use bookstore_core::{Book, BookId, NewBook, Price, SearchField};

use super::{ServiceError, required};
use crate::db::{Gateway, RepositoryError, Sequence};

/// Raw "add book" form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookDraft {
    pub title: Option<String>,
    pub author: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub genre: Option<String>,
    pub published_year: Option<i32>,
    pub publisher: Option<String>,
}

impl BookDraft {
    /// Check every field is present and the price is non-negative.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::MissingField` for the first absent or blank field.
    /// Returns `ServiceError::InvalidPrice` for a negative or oversized price.
    pub fn validate(&self) -> Result<NewBook, ServiceError> {
        let title = required(self.title.as_deref(), "title")?;
        let author = required(self.author.as_deref(), "author")?;
        let price = self.price.ok_or(ServiceError::MissingField("price"))?;
        let genre = required(self.genre.as_deref(), "genre")?;
        let published_year = self
            .published_year
            .ok_or(ServiceError::MissingField("published_year"))?;
        let publisher = required(self.publisher.as_deref(), "publisher")?;

        Ok(NewBook {
            title,
            author,
            price: Price::new(price)?,
            genre,
            published_year,
            publisher,
        })
    }
}

/// Catalog operations for one request.
pub struct CatalogService<'a> {
    gateway: &'a dyn Gateway,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(gateway: &'a dyn Gateway) -> Self {
        Self { gateway }
    }

    /// Every book, in ID order.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if the gateway fails.
    pub async fn list(&self) -> Result<Vec<Book>, ServiceError> {
        Ok(self.gateway.list_books().await?)
    }

    /// Books whose `field` contains `term`, ignoring case.
    ///
    /// An empty term lists the whole catalog. Any other term, whitespace
    /// included, is matched literally.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if the gateway fails.
    pub async fn search(&self, term: &str, field: SearchField) -> Result<Vec<Book>, ServiceError> {
        if term.is_empty() {
            return self.list().await;
        }
        let books = self.gateway.search_books(field, term).await?;
        tracing::debug!(field = field.as_str(), term, hits = books.len(), "Catalog search");
        Ok(books)
    }

    /// A single book.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::BookNotFound` if no book has this ID.
    pub async fn book(&self, id: BookId) -> Result<Book, ServiceError> {
        self.gateway
            .find_book(id)
            .await?
            .ok_or(ServiceError::BookNotFound(id))
    }

    /// Validate `draft` and insert it under the next book ID.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::MissingField` or `ServiceError::InvalidPrice` for bad input.
    /// Returns `ServiceError::DuplicateTitle` if a book with this title exists.
    pub async fn add_book(&self, draft: &BookDraft) -> Result<Book, ServiceError> {
        let new_book = draft.validate()?;

        if self.gateway.title_exists(&new_book.title).await? {
            return Err(ServiceError::DuplicateTitle);
        }

        let id = self.gateway.next_id(Sequence::Books).await?;
        let book = new_book.with_id(BookId::new(id));
        self.gateway
            .insert_book(&book)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ServiceError::DuplicateTitle,
                other => ServiceError::StorageUnavailable(other),
            })?;

        tracing::info!(book_id = %book.id, title = %book.title, "Book added");
        Ok(book)
    }

    /// Remove a book. Orders and reviews that reference it are kept.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::BookNotFound` if nothing was removed.
    pub async fn delete_book(&self, id: BookId) -> Result<(), ServiceError> {
        if !self.gateway.delete_book(id).await? {
            return Err(ServiceError::BookNotFound(id));
        }
        tracing::info!(book_id = %id, "Book deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bookstore_core::PriceError;

    use super::*;
    use crate::db::MemoryGateway;

    fn draft(title: &str, genre: &str) -> BookDraft {
        BookDraft {
            title: Some(title.to_owned()),
            author: Some("Mary Beard".to_owned()),
            price: Some(Decimal::new(2250, 2)),
            genre: Some(genre.to_owned()),
            published_year: Some(2015),
            publisher: Some("Profile".to_owned()),
        }
    }

    async fn seeded(gateway: &MemoryGateway) {
        let catalog = CatalogService::new(gateway);
        for (title, genre) in [("SPQR", "History"), ("Women & Power", "Essays"), ("Pompeii", "History")] {
            catalog.add_book(&draft(title, genre)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_add_book_takes_next_id() {
        let gateway = MemoryGateway::new();
        seeded(&gateway).await;
        let catalog = CatalogService::new(&gateway);

        let book = catalog.add_book(&draft("Confronting the Classics", "Essays")).await.unwrap();
        assert_eq!(book.id, BookId::new(4));
    }

    #[tokio::test]
    async fn test_duplicate_title_rejected() {
        let gateway = MemoryGateway::new();
        seeded(&gateway).await;
        let catalog = CatalogService::new(&gateway);

        assert!(matches!(
            catalog.add_book(&draft("SPQR", "History")).await,
            Err(ServiceError::DuplicateTitle)
        ));
        assert_eq!(catalog.list().await.unwrap().len(), 3);
    }

    #[test]
    fn test_validate_reports_missing_and_negative() {
        let mut no_price = draft("SPQR", "History");
        no_price.price = None;
        assert!(matches!(
            no_price.validate(),
            Err(ServiceError::MissingField("price"))
        ));

        let mut blank_author = draft("SPQR", "History");
        blank_author.author = Some("   ".to_owned());
        assert!(matches!(
            blank_author.validate(),
            Err(ServiceError::MissingField("author"))
        ));

        let mut negative = draft("SPQR", "History");
        negative.price = Some(Decimal::new(-1, 0));
        assert!(matches!(negative.validate(), Err(ServiceError::InvalidPrice(_))));

        let mut huge = draft("SPQR", "History");
        huge.price = Some(Decimal::new(100_000_000, 0));
        assert!(matches!(
            huge.validate(),
            Err(ServiceError::InvalidPrice(PriceError::TooLarge(_)))
        ));
    }

    #[tokio::test]
    async fn test_added_price_matches_stored_price() {
        let gateway = MemoryGateway::new();
        let catalog = CatalogService::new(&gateway);

        let mut odd = draft("SPQR", "History");
        odd.price = Some(Decimal::new(12345, 3));
        let added = catalog.add_book(&odd).await.unwrap();
        assert_eq!(added.price.amount(), Decimal::new(1235, 2));
        assert_eq!(catalog.book(added.id).await.unwrap().price, added.price);
    }

    #[tokio::test]
    async fn test_search_and_empty_term() {
        let gateway = MemoryGateway::new();
        seeded(&gateway).await;
        let catalog = CatalogService::new(&gateway);

        let history = catalog.search("hist", SearchField::Genre).await.unwrap();
        let titles: Vec<_> = history.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["SPQR", "Pompeii"]);

        assert_eq!(catalog.search("", SearchField::Author).await.unwrap().len(), 3);
        // Whitespace is a literal term, not "no term".
        assert_eq!(catalog.search(" ", SearchField::Author).await.unwrap().len(), 3);
        assert!(catalog.search("   ", SearchField::Author).await.unwrap().is_empty());
        assert!(catalog.search("tolkien", SearchField::Author).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_book() {
        let gateway = MemoryGateway::new();
        seeded(&gateway).await;
        let catalog = CatalogService::new(&gateway);

        catalog.delete_book(BookId::new(2)).await.unwrap();
        assert!(matches!(
            catalog.book(BookId::new(2)).await,
            Err(ServiceError::BookNotFound(_))
        ));
        assert!(matches!(
            catalog.delete_book(BookId::new(2)).await,
            Err(ServiceError::BookNotFound(_))
        ));
    }
}
