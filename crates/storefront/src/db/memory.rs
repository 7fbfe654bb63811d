//! Process-local adapter for the [`Gateway`] port.
//!
//! Collections are plain vectors behind one `RwLock`; sequences are atomic
//! counters so IDs stay unique even when two requests race.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use bookstore_core::{Book, BookId, Order, Review, SearchField, User, UserId, UserType};

use super::{Collection, Gateway, RepositoryError, Sequence};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    books: Vec<Book>,
    orders: Vec<Order>,
    reviews: Vec<Review>,
}

/// [`Gateway`] holding every collection in memory.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    tables: RwLock<Tables>,
    book_seq: AtomicI32,
    order_seq: AtomicI32,
    review_seq: AtomicI32,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing records.
    ///
    /// Each sequence continues after the highest ID already present.
    #[must_use]
    pub fn with_records(
        users: Vec<User>,
        books: Vec<Book>,
        orders: Vec<Order>,
        reviews: Vec<Review>,
    ) -> Self {
        let max_book = books.iter().map(|b| b.id.as_i32()).max().unwrap_or(0);
        let max_order = orders.iter().map(|o| o.id.as_i32()).max().unwrap_or(0);
        let max_review = reviews.iter().map(|r| r.id.as_i32()).max().unwrap_or(0);

        Self {
            tables: RwLock::new(Tables {
                users,
                books,
                orders,
                reviews,
            }),
            book_seq: AtomicI32::new(max_book),
            order_seq: AtomicI32::new(max_order),
            review_seq: AtomicI32::new(max_review),
        }
    }

    const fn counter(&self, sequence: Sequence) -> &AtomicI32 {
        match sequence {
            Sequence::Books => &self.book_seq,
            Sequence::Orders => &self.order_seq,
            Sequence::Reviews => &self.review_seq,
        }
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn find_user(
        &self,
        id: UserId,
        role: UserType,
    ) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.id == id && u.user_type == role)
            .cloned())
    }

    async fn user_exists(&self, id: UserId) -> Result<bool, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().any(|u| u.id == id))
    }

    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.id == user.id) {
            return Err(RepositoryError::Conflict("user id already exists".to_owned()));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn update_user_profile(
        &self,
        id: UserId,
        role: UserType,
        username: &str,
        email: &str,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables
            .users
            .iter_mut()
            .find(|u| u.id == id && u.user_type == role)
        else {
            return Ok(false);
        };
        username.clone_into(&mut user.username);
        email.clone_into(&mut user.email);
        Ok(true)
    }

    async fn list_books(&self) -> Result<Vec<Book>, RepositoryError> {
        Ok(self.tables.read().await.books.clone())
    }

    async fn search_books(
        &self,
        field: SearchField,
        term: &str,
    ) -> Result<Vec<Book>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .iter()
            .filter(|b| field.matches(b, term))
            .cloned()
            .collect())
    }

    async fn find_book(&self, id: BookId) -> Result<Option<Book>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.books.iter().find(|b| b.id == id).cloned())
    }

    async fn title_exists(&self, title: &str) -> Result<bool, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.books.iter().any(|b| b.title == title))
    }

    async fn insert_book(&self, book: &Book) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .books
            .iter()
            .any(|b| b.id == book.id || b.title == book.title)
        {
            return Err(RepositoryError::Conflict("book already exists".to_owned()));
        }
        tables.books.push(book.clone());
        Ok(())
    }

    async fn delete_book(&self, id: BookId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.books.len();
        tables.books.retain(|b| b.id != id);
        Ok(tables.books.len() < before)
    }

    async fn insert_order(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.orders.iter().any(|o| o.id == order.id) {
            return Err(RepositoryError::Conflict("order id already exists".to_owned()));
        }
        tables.orders.push(order.clone());
        Ok(())
    }

    async fn list_orders(&self, user: Option<UserId>) -> Result<Vec<Order>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .iter()
            .filter(|o| user.is_none_or(|id| o.user_id == id))
            .cloned()
            .collect())
    }

    async fn insert_review(&self, review: &Review) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.reviews.iter().any(|r| r.id == review.id) {
            return Err(RepositoryError::Conflict("review id already exists".to_owned()));
        }
        tables.reviews.push(review.clone());
        Ok(())
    }

    async fn list_reviews(&self, book_ids: &[BookId]) -> Result<Vec<Review>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .iter()
            .filter(|r| book_ids.contains(&r.book_id))
            .cloned()
            .collect())
    }

    async fn next_id(&self, sequence: Sequence) -> Result<i32, RepositoryError> {
        // Stops at i32::MAX instead of wrapping to negative IDs.
        self.counter(sequence)
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
            .ok()
            .and_then(|previous| previous.checked_add(1))
            .ok_or_else(|| RepositoryError::DataCorruption("id sequence exhausted".to_owned()))
    }

    async fn count(&self, collection: Collection) -> Result<u64, RepositoryError> {
        let tables = self.tables.read().await;
        let len = match collection {
            Collection::Users => tables.users.len(),
            Collection::Books => tables.books.len(),
            Collection::Orders => tables.orders.len(),
            Collection::Reviews => tables.reviews.len(),
        };
        u64::try_from(len).map_err(|e| RepositoryError::DataCorruption(e.to_string()))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use bookstore_core::{NewBook, Price};
    use rust_decimal::Decimal;

    use super::*;

    fn book(id: i32, title: &str, genre: &str) -> Book {
        NewBook {
            title: title.to_owned(),
            author: "Ursula K. Le Guin".to_owned(),
            price: Price::new(Decimal::new(999, 2)).unwrap(),
            genre: genre.to_owned(),
            published_year: 1969,
            publisher: "Ace".to_owned(),
        }
        .with_id(BookId::new(id))
    }

    fn customer(id: i32) -> User {
        User {
            id: UserId::new(id),
            username: "Genly".to_owned(),
            email: "genly@example.com".to_owned(),
            user_type: UserType::Customer,
        }
    }

    #[tokio::test]
    async fn test_sequences_continue_after_seeded_ids() {
        let gateway = MemoryGateway::with_records(
            vec![],
            vec![book(4, "The Dispossessed", "Science Fiction")],
            vec![],
            vec![],
        );
        assert_eq!(gateway.next_id(Sequence::Books).await.unwrap(), 5);
        assert_eq!(gateway.next_id(Sequence::Orders).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_sequence_keeps_failing() {
        let gateway = MemoryGateway::with_records(
            vec![],
            vec![book(i32::MAX, "The Last Book", "Fantasy")],
            vec![],
            vec![],
        );
        for _ in 0..2 {
            assert!(matches!(
                gateway.next_id(Sequence::Books).await,
                Err(RepositoryError::DataCorruption(_))
            ));
        }
        assert_eq!(gateway.book_seq.load(Ordering::SeqCst), i32::MAX);
        assert_eq!(gateway.next_id(Sequence::Reviews).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_deleted_book_ids_are_not_reused() {
        let gateway = MemoryGateway::new();
        let first = gateway.next_id(Sequence::Books).await.unwrap();
        gateway
            .insert_book(&book(first, "Lathe of Heaven", "Fantasy"))
            .await
            .unwrap();
        assert!(gateway.delete_book(BookId::new(first)).await.unwrap());

        let second = gateway.next_id(Sequence::Books).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_concurrent_next_id_is_unique() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut handles = Vec::new();
        for _ in 0..32 {
            let gateway = Arc::clone(&gateway);
            handles.push(tokio::spawn(async move {
                gateway.next_id(Sequence::Orders).await.unwrap()
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 32);
    }

    #[tokio::test]
    async fn test_duplicate_user_and_title_conflict() {
        let gateway = MemoryGateway::new();
        gateway.insert_user(&customer(1)).await.unwrap();
        assert!(matches!(
            gateway.insert_user(&customer(1)).await,
            Err(RepositoryError::Conflict(_))
        ));

        gateway
            .insert_book(&book(1, "Earthsea", "Fantasy"))
            .await
            .unwrap();
        assert!(matches!(
            gateway.insert_book(&book(2, "Earthsea", "Fantasy")).await,
            Err(RepositoryError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_find_user_requires_matching_role() {
        let gateway = MemoryGateway::new();
        gateway.insert_user(&customer(9)).await.unwrap();

        assert!(
            gateway
                .find_user(UserId::new(9), UserType::Admin)
                .await
                .unwrap()
                .is_none()
        );
        assert!(gateway.user_exists(UserId::new(9)).await.unwrap());
    }

    #[tokio::test]
    async fn test_search_and_orders_filter() {
        let gateway = MemoryGateway::with_records(
            vec![],
            vec![
                book(1, "Earthsea", "Fantasy"),
                book(2, "The Word for World Is Forest", "Science Fiction"),
            ],
            vec![],
            vec![],
        );
        let found = gateway
            .search_books(SearchField::Genre, "fiction")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, BookId::new(2));

        assert_eq!(gateway.count(Collection::Books).await.unwrap(), 2);
        assert!(gateway.list_orders(Some(UserId::new(1))).await.unwrap().is_empty());
    }
}
