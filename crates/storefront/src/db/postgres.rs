//! `PostgreSQL` adapter for the [`Gateway`] port.
//!
//! Queries are checked at runtime (`query_as` + `FromRow`) so the crate builds
//! without a live database. Tables live in the `bookstore` schema.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use bookstore_core::{
    Book, BookId, Order, OrderId, OrderStatus, Price, Rating, Review, ReviewId, SearchField, User,
    UserId, UserType,
};

use super::{Collection, Gateway, RepositoryError, Sequence};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: i32,
    username: String,
    email: String,
    user_type: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let user_type = row.user_type.parse::<UserType>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid user type in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.user_id),
            username: row.username,
            email: row.email,
            user_type,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    book_id: i32,
    title: String,
    author: String,
    price: Decimal,
    genre: String,
    published_year: i32,
    publisher: String,
}

impl TryFrom<BookRow> for Book {
    type Error = RepositoryError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for book {}: {e}", row.book_id))
        })?;

        Ok(Self {
            id: BookId::new(row.book_id),
            title: row.title,
            author: row.author,
            price,
            genre: row.genre,
            published_year: row.published_year,
            publisher: row.publisher,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_id: i32,
    user_id: i32,
    book_id: i32,
    order_date: NaiveDate,
    price: Decimal,
    order_status: String,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid price for order {}: {e}",
                row.order_id
            ))
        })?;
        let status = row.order_status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Self {
            id: OrderId::new(row.order_id),
            user_id: UserId::new(row.user_id),
            book_id: BookId::new(row.book_id),
            order_date: row.order_date,
            price,
            status,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    review_id: i32,
    book_id: i32,
    user_id: i32,
    rating: i16,
    comment: String,
    review_date: NaiveDate,
}

impl TryFrom<ReviewRow> for Review {
    type Error = RepositoryError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let rating = Rating::new(i64::from(row.rating)).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid rating for review {}: {e}",
                row.review_id
            ))
        })?;

        Ok(Self {
            id: ReviewId::new(row.review_id),
            book_id: BookId::new(row.book_id),
            user_id: UserId::new(row.user_id),
            rating,
            comment: row.comment,
            review_date: row.review_date,
        })
    }
}

fn collect<R, T>(rows: Vec<R>) -> Result<Vec<T>, RepositoryError>
where
    T: TryFrom<R, Error = RepositoryError>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// Map unique violations to `Conflict`, everything else to `Database`.
fn conflict_or_database(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

const BOOK_COLUMNS: &str = "book_id, title, author, price, genre, published_year, publisher";

// =============================================================================
// Gateway
// =============================================================================

/// [`Gateway`] over a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn find_user(
        &self,
        id: UserId,
        role: UserType,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT user_id, username, email, user_type
            FROM bookstore.users
            WHERE user_id = $1 AND user_type = $2
            ",
        )
        .bind(id.as_i32())
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn user_exists(&self, id: UserId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bookstore.users WHERE user_id = $1)",
        )
        .bind(id.as_i32())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO bookstore.users (user_id, username, email, user_type)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(user.id.as_i32())
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.user_type.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "user id"))?;

        Ok(())
    }

    async fn update_user_profile(
        &self,
        id: UserId,
        role: UserType,
        username: &str,
        email: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE bookstore.users
            SET username = $3, email = $4
            WHERE user_id = $1 AND user_type = $2
            ",
        )
        .bind(id.as_i32())
        .bind(role.as_str())
        .bind(username)
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_books(&self) -> Result<Vec<Book>, RepositoryError> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM bookstore.books ORDER BY book_id");
        let rows = sqlx::query_as::<_, BookRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        collect(rows)
    }

    async fn search_books(
        &self,
        field: SearchField,
        term: &str,
    ) -> Result<Vec<Book>, RepositoryError> {
        // Column names come from a closed enum; the term is always bound.
        let sql = format!(
            "SELECT {BOOK_COLUMNS} FROM bookstore.books \
             WHERE strpos(lower({column}), lower($1)) > 0 \
             ORDER BY book_id",
            column = field.as_str()
        );
        let rows = sqlx::query_as::<_, BookRow>(&sql)
            .bind(term)
            .fetch_all(&self.pool)
            .await?;

        collect(rows)
    }

    async fn find_book(&self, id: BookId) -> Result<Option<Book>, RepositoryError> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM bookstore.books WHERE book_id = $1");
        let row = sqlx::query_as::<_, BookRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Book::try_from).transpose()
    }

    async fn title_exists(&self, title: &str) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bookstore.books WHERE title = $1)",
        )
        .bind(title)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert_book(&self, book: &Book) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO bookstore.books
                (book_id, title, author, price, genre, published_year, publisher)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(book.id.as_i32())
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.price.amount())
        .bind(&book.genre)
        .bind(book.published_year)
        .bind(&book.publisher)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "book"))?;

        Ok(())
    }

    async fn delete_book(&self, id: BookId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM bookstore.books WHERE book_id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_order(&self, order: &Order) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO bookstore.orders
                (order_id, user_id, book_id, order_date, price, order_status)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(order.id.as_i32())
        .bind(order.user_id.as_i32())
        .bind(order.book_id.as_i32())
        .bind(order.order_date)
        .bind(order.price.amount())
        .bind(order.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "order id"))?;

        Ok(())
    }

    async fn list_orders(&self, user: Option<UserId>) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT order_id, user_id, book_id, order_date, price, order_status
            FROM bookstore.orders
            WHERE $1::INTEGER IS NULL OR user_id = $1
            ORDER BY order_id
            ",
        )
        .bind(user.map(|id| id.as_i32()))
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn insert_review(&self, review: &Review) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO bookstore.reviews
                (review_id, book_id, user_id, rating, comment, review_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(review.id.as_i32())
        .bind(review.book_id.as_i32())
        .bind(review.user_id.as_i32())
        .bind(i16::from(review.rating.stars()))
        .bind(&review.comment)
        .bind(review.review_date)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "review id"))?;

        Ok(())
    }

    async fn list_reviews(&self, book_ids: &[BookId]) -> Result<Vec<Review>, RepositoryError> {
        let ids: Vec<i32> = book_ids.iter().map(|id| id.as_i32()).collect();
        let rows = sqlx::query_as::<_, ReviewRow>(
            r"
            SELECT review_id, book_id, user_id, rating, comment, review_date
            FROM bookstore.reviews
            WHERE book_id = ANY($1)
            ORDER BY review_id
            ",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn next_id(&self, sequence: Sequence) -> Result<i32, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>("SELECT nextval($1::text::regclass)::INTEGER")
            .bind(sequence.pg_name())
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    async fn count(&self, collection: Collection) -> Result<u64, RepositoryError> {
        let sql = format!("SELECT COUNT(*) FROM bookstore.{}", collection.table());
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await?;

        u64::try_from(count)
            .map_err(|e| RepositoryError::DataCorruption(format!("negative row count: {e}")))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
