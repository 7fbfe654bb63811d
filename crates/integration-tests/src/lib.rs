//! Integration tests for the bookstore storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bookstore-integration-tests
//! ```
//!
//! Each test spawns the real router on an ephemeral local port, backed by the
//! in-memory gateway and session store, and drives it with a cookie-keeping
//! `reqwest` client. No database or external service is needed.
//!
//! # Test Categories
//!
//! - `session_flow` - Role selection, login, account creation, navigation, logout
//! - `catalog` - Search and admin book management
//! - `orders_reviews` - Ordering and reviewing as a customer, listing as an admin
//! - `error_bodies` - Malformed request bodies and storage outages

use std::sync::Arc;

use reqwest::{Client, Response};
use serde_json::{Value, json};
use tower_sessions::MemoryStore;

use bookstore_core::{Book, User, UserId, UserType};
use bookstore_storefront::build_app;
use bookstore_storefront::config::StorefrontConfig;
use bookstore_storefront::db::{Gateway, MemoryGateway};
use bookstore_storefront::middleware::create_session_layer;
use bookstore_storefront::state::AppState;

/// A running storefront plus one browser session.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub gateway: Arc<MemoryGateway>,
}

impl TestApp {
    /// Spawn a storefront with the standard fixture records.
    pub async fn spawn() -> Self {
        Self::spawn_with(fixture_gateway()).await
    }

    /// Spawn a storefront over `gateway`.
    pub async fn spawn_with(gateway: MemoryGateway) -> Self {
        Self::spawn_behind(gateway, |memory| memory as Arc<dyn Gateway>).await
    }

    /// Spawn a storefront whose handlers see `wrap(gateway)` instead of the
    /// records directly. `TestApp::gateway` still reaches the records.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn spawn_behind<F>(gateway: MemoryGateway, wrap: F) -> Self
    where
        F: FnOnce(Arc<MemoryGateway>) -> Arc<dyn Gateway>,
    {
        let gateway = Arc::new(gateway);
        let config = StorefrontConfig::in_memory();
        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let state = AppState::new(wrap(Arc::clone(&gateway)));
        let app = build_app(state, session_layer);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: new_client(),
            gateway,
        }
    }

    /// A second browser session against the same server.
    #[must_use]
    pub fn new_session(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: new_client(),
            gateway: Arc::clone(&self.gateway),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET")
    }

    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST")
    }

    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn put(&self, path: &str, body: &Value) -> Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT")
    }

    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE")
    }

    /// Select `role` and log in as `user_id`, returning the login response.
    pub async fn login(&self, role: &str, user_id: i32) -> Response {
        let response = self.post("/session/role", &json!({ "role": role })).await;
        assert!(response.status().is_success(), "role selection failed");
        self.post("/session/login", &json!({ "user_id": user_id })).await
    }

    /// Log in as the fixture customer (ID 42).
    pub async fn login_customer(&self) {
        let response = self.login("Customer", CUSTOMER_ID).await;
        assert!(response.status().is_success(), "customer login failed");
    }

    /// Log in as the fixture admin (ID 7).
    pub async fn login_admin(&self) {
        let response = self.login("Admin", ADMIN_ID).await;
        assert!(response.status().is_success(), "admin login failed");
    }
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Read a JSON body.
///
/// # Panics
///
/// Panics if the body is not JSON.
pub async fn json_body(response: Response) -> Value {
    response.json().await.expect("Response body is not JSON")
}

pub const ADMIN_ID: i32 = 7;
pub const CUSTOMER_ID: i32 = 42;

/// Admin 7 "A", customer 42 "Kim" and three books with IDs 1 to 3.
#[must_use]
pub fn fixture_gateway() -> MemoryGateway {
    let users = vec![
        User {
            id: UserId::new(ADMIN_ID),
            username: "A".to_owned(),
            email: "a@example.com".to_owned(),
            user_type: UserType::Admin,
        },
        User {
            id: UserId::new(CUSTOMER_ID),
            username: "Kim".to_owned(),
            email: "kim@example.com".to_owned(),
            user_type: UserType::Customer,
        },
    ];
    MemoryGateway::with_records(users, fixture_books(), vec![], vec![])
}

fn fixture_books() -> Vec<Book> {
    serde_json::from_value(json!([
        {
            "BookID": 1, "title": "SPQR", "author": "Mary Beard", "price": 22.5,
            "genre": "History", "published_year": 2015, "publisher": "Profile"
        },
        {
            "BookID": 2, "title": "The Left Hand of Darkness", "author": "Ursula K. Le Guin",
            "price": 9.99, "genre": "Science Fiction", "published_year": 1969, "publisher": "Ace"
        },
        {
            "BookID": 3, "title": "A People's History", "author": "Howard Zinn", "price": 18.0,
            "genre": "History", "published_year": 1980, "publisher": "Harper & Row"
        }
    ]))
    .expect("Fixture books are valid")
}
