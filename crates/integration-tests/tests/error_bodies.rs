//! Integration tests for error bodies: malformed input and storage outages.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde_json::json;

use bookstore_core::{Book, BookId, Order, Review, SearchField, User, UserId, UserType};
use bookstore_integration_tests::{TestApp, fixture_gateway, json_body};
use bookstore_storefront::db::{Collection, Gateway, MemoryGateway, RepositoryError, Sequence};

fn is_json(resp: &reqwest::Response) -> bool {
    resp.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json")
}

#[tokio::test]
async fn test_wrong_shape_body_is_json_error() {
    let app = TestApp::spawn().await;
    app.login_customer().await;

    let resp = app.post("/orders", &json!({})).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(is_json(&resp));
    let body = json_body(resp).await;
    assert_eq!(body["kind"], "bad_request");
    assert!(body["message"].as_str().unwrap().contains("book_id"));

    let resp = app
        .post("/reviews", &json!({ "book_id": 1, "rating": "five", "comment": "Good" }))
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(resp).await["kind"], "bad_request");

    let resp = app.put("/profile", &json!({ "name": "Kim" })).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(resp).await["kind"], "bad_request");

    // The session is untouched by a rejected body.
    let body = json_body(app.get("/session").await).await;
    assert_eq!(body["flags"]["authenticated"], true);
}

#[tokio::test]
async fn test_fractional_year_is_rejected_before_insert() {
    let app = TestApp::spawn().await;
    app.login_admin().await;

    let resp = app
        .post(
            "/books",
            &json!({
                "title": "Foundation",
                "author": "Isaac Asimov",
                "price": 8.5,
                "genre": "Science Fiction",
                "published_year": 1950.0,
                "publisher": "Gnome Press"
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(is_json(&resp));
    assert_eq!(json_body(resp).await["kind"], "bad_request");
    assert_eq!(app.gateway.count(Collection::Books).await.unwrap(), 3);
}

#[tokio::test]
async fn test_broken_json_and_missing_content_type() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/session/role"))
        .header(CONTENT_TYPE, "application/json")
        .body(r#"{"role": "#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(is_json(&resp));
    assert_eq!(json_body(resp).await["kind"], "bad_request");

    let resp = app
        .client
        .post(app.url("/session/role"))
        .body(r#"{"role": "Customer"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(json_body(resp).await["kind"], "bad_request");
}

#[tokio::test]
async fn test_oversized_price_is_invalid_input() {
    let app = TestApp::spawn().await;
    app.login_admin().await;

    let resp = app
        .post(
            "/books",
            &json!({
                "title": "Gold Edition",
                "author": "Anon",
                "price": 100_000_000.0,
                "genre": "Luxury",
                "published_year": 2024,
                "publisher": "Vault"
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(resp).await["kind"], "invalid_price");
}

// =============================================================================
// Storage outage
// =============================================================================

/// Passes every call through to the records unless `down` is set.
struct SwitchableGateway {
    records: Arc<MemoryGateway>,
    down: Arc<AtomicBool>,
}

impl SwitchableGateway {
    fn check(&self) -> Result<(), RepositoryError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl Gateway for SwitchableGateway {
    async fn find_user(
        &self,
        id: UserId,
        role: UserType,
    ) -> Result<Option<User>, RepositoryError> {
        self.check()?;
        self.records.find_user(id, role).await
    }

    async fn user_exists(&self, id: UserId) -> Result<bool, RepositoryError> {
        self.check()?;
        self.records.user_exists(id).await
    }

    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError> {
        self.check()?;
        self.records.insert_user(user).await
    }

    async fn update_user_profile(
        &self,
        id: UserId,
        role: UserType,
        username: &str,
        email: &str,
    ) -> Result<bool, RepositoryError> {
        self.check()?;
        self.records
            .update_user_profile(id, role, username, email)
            .await
    }

    async fn list_books(&self) -> Result<Vec<Book>, RepositoryError> {
        self.check()?;
        self.records.list_books().await
    }

    async fn search_books(
        &self,
        field: SearchField,
        term: &str,
    ) -> Result<Vec<Book>, RepositoryError> {
        self.check()?;
        self.records.search_books(field, term).await
    }

    async fn find_book(&self, id: BookId) -> Result<Option<Book>, RepositoryError> {
        self.check()?;
        self.records.find_book(id).await
    }

    async fn title_exists(&self, title: &str) -> Result<bool, RepositoryError> {
        self.check()?;
        self.records.title_exists(title).await
    }

    async fn insert_book(&self, book: &Book) -> Result<(), RepositoryError> {
        self.check()?;
        self.records.insert_book(book).await
    }

    async fn delete_book(&self, id: BookId) -> Result<bool, RepositoryError> {
        self.check()?;
        self.records.delete_book(id).await
    }

    async fn insert_order(&self, order: &Order) -> Result<(), RepositoryError> {
        self.check()?;
        self.records.insert_order(order).await
    }

    async fn list_orders(&self, user: Option<UserId>) -> Result<Vec<Order>, RepositoryError> {
        self.check()?;
        self.records.list_orders(user).await
    }

    async fn insert_review(&self, review: &Review) -> Result<(), RepositoryError> {
        self.check()?;
        self.records.insert_review(review).await
    }

    async fn list_reviews(&self, book_ids: &[BookId]) -> Result<Vec<Review>, RepositoryError> {
        self.check()?;
        self.records.list_reviews(book_ids).await
    }

    async fn next_id(&self, sequence: Sequence) -> Result<i32, RepositoryError> {
        self.check()?;
        self.records.next_id(sequence).await
    }

    async fn count(&self, collection: Collection) -> Result<u64, RepositoryError> {
        self.check()?;
        self.records.count(collection).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check()?;
        self.records.ping().await
    }
}

async fn spawn_switchable() -> (TestApp, Arc<AtomicBool>) {
    let down = Arc::new(AtomicBool::new(false));
    let switch = Arc::clone(&down);
    let app = TestApp::spawn_behind(fixture_gateway(), move |records| {
        Arc::new(SwitchableGateway {
            records,
            down: switch,
        }) as Arc<dyn Gateway>
    })
    .await;
    (app, down)
}

#[tokio::test]
async fn test_outage_shows_banner_and_session_survives() {
    let (app, down) = spawn_switchable().await;
    app.login_customer().await;

    down.store(true, Ordering::SeqCst);

    let resp = app.get("/books").await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(is_json(&resp));
    let body = json_body(resp).await;
    assert_eq!(body["kind"], "storage_unavailable");
    assert_eq!(
        body["message"],
        "The bookstore is temporarily unavailable. Please try again."
    );

    let resp = app.post("/orders", &json!({ "book_id": 1 })).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(app.get("/health/ready").await.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Same cookie, still logged in on the same view.
    let body = json_body(app.get("/session").await).await;
    assert_eq!(body["flags"]["authenticated"], true);
    assert_eq!(body["flags"]["search"], true);

    down.store(false, Ordering::SeqCst);

    let resp = app.get("/books").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["data"].as_array().unwrap().len(), 3);
    assert_eq!(app.gateway.count(Collection::Orders).await.unwrap(), 0);
}
