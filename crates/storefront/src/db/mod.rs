//! Persistence gateway for the four record collections.
//!
//! # Collections
//!
//! - `users` - Customer and admin accounts, keyed by the caller-chosen `UserID`
//! - `books` - The catalog, unique by title
//! - `orders` - One row per purchase, never updated
//! - `reviews` - One row per review, never updated or deleted
//!
//! Services talk to the [`Gateway`] trait only. Two adapters implement it:
//! [`PgGateway`] (`PostgreSQL` via sqlx, sessions in the same database) and
//! [`MemoryGateway`] (process-local, used by tests and `BOOKSTORE_STORAGE=memory`).
//!
//! # Sequential IDs
//!
//! Book, order and review IDs come from [`Gateway::next_id`], backed by
//! `PostgreSQL` sequences or atomic counters. Two sessions creating records at
//! once can never be handed the same ID, and IDs of deleted books are not
//! reused.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p bookstore-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use bookstore_core::{Book, BookId, Order, Review, SearchField, User, UserId, UserType};

pub use memory::MemoryGateway;
pub use postgres::PgGateway;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate user ID or book title).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// A record collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Books,
    Orders,
    Reviews,
}

impl Collection {
    /// Table name inside the `bookstore` schema.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Books => "books",
            Self::Orders => "orders",
            Self::Reviews => "reviews",
        }
    }
}

/// A collection whose IDs are assigned by the store.
///
/// User IDs are chosen at account creation and have no sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sequence {
    Books,
    Orders,
    Reviews,
}

impl Sequence {
    /// `PostgreSQL` sequence backing this collection.
    #[must_use]
    pub const fn pg_name(&self) -> &'static str {
        match self {
            Self::Books => "bookstore.book_id_seq",
            Self::Orders => "bookstore.order_id_seq",
            Self::Reviews => "bookstore.review_id_seq",
        }
    }
}

/// Find/insert/update/delete/count access to the record collections.
///
/// Results keep insertion order where the store has one (ascending ID).
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Find the user with exactly this ID and role.
    async fn find_user(&self, id: UserId, role: UserType)
    -> Result<Option<User>, RepositoryError>;

    /// Whether any user, of either role, holds `id`.
    async fn user_exists(&self, id: UserId) -> Result<bool, RepositoryError>;

    /// Insert a user. Fails with `Conflict` if the ID is taken.
    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError>;

    /// Overwrite name and email of the `(id, role)` user.
    ///
    /// Returns `false` when no user matched.
    async fn update_user_profile(
        &self,
        id: UserId,
        role: UserType,
        username: &str,
        email: &str,
    ) -> Result<bool, RepositoryError>;

    async fn list_books(&self) -> Result<Vec<Book>, RepositoryError>;

    /// Books whose `field` contains `term`, ignoring case. `term` is literal text.
    async fn search_books(
        &self,
        field: SearchField,
        term: &str,
    ) -> Result<Vec<Book>, RepositoryError>;

    async fn find_book(&self, id: BookId) -> Result<Option<Book>, RepositoryError>;

    /// Whether a book with exactly this title exists.
    async fn title_exists(&self, title: &str) -> Result<bool, RepositoryError>;

    /// Insert a book. Fails with `Conflict` if the ID or title is taken.
    async fn insert_book(&self, book: &Book) -> Result<(), RepositoryError>;

    /// Remove a book by ID. Returns `false` when nothing was removed.
    async fn delete_book(&self, id: BookId) -> Result<bool, RepositoryError>;

    async fn insert_order(&self, order: &Order) -> Result<(), RepositoryError>;

    /// All orders, or only those placed by `user` when given.
    async fn list_orders(&self, user: Option<UserId>) -> Result<Vec<Order>, RepositoryError>;

    async fn insert_review(&self, review: &Review) -> Result<(), RepositoryError>;

    /// Reviews of any of `book_ids`.
    async fn list_reviews(&self, book_ids: &[BookId]) -> Result<Vec<Review>, RepositoryError>;

    /// Reserve the next ID of `sequence`.
    async fn next_id(&self, sequence: Sequence) -> Result<i32, RepositoryError>;

    /// Number of records in `collection`.
    async fn count(&self, collection: Collection) -> Result<u64, RepositoryError>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
