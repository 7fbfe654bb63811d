//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//! GET    /health/ready           - Gateway ping
//!
//! # Session navigator
//! GET    /session                - Current flags, view and capabilities
//! POST   /session/role           - Choose Customer or Admin
//! POST   /session/login          - Log in with a user ID for the chosen role
//! POST   /session/account/start  - Open the account creation form
//! POST   /session/account        - Create an account and log in
//! POST   /session/navigate       - Switch view
//! POST   /session/logout         - Log out
//!
//! # Profile (requires login)
//! GET    /profile                - Current user's record
//! PUT    /profile                - Save name and email
//!
//! # Catalog
//! GET    /books?term=&field=     - List or search books
//! POST   /books                  - Add a book (admin)
//! DELETE /books/{id}             - Delete a book (admin)
//!
//! # Orders and reviews
//! GET    /orders                 - Own orders, or all for admins
//! POST   /orders                 - Order a book (customer)
//! GET    /reviews                - Reviews of catalog books
//! POST   /reviews                - Review a book (customer)
//! ```

pub mod books;
pub mod orders;
pub mod profile;
pub mod reviews;
pub mod session;

use axum::{
    Router,
    extract::FromRequest,
    routing::{delete, get, post},
};
use serde::Serialize;

use crate::error::AppError;
use crate::middleware::Navigator;
use crate::models::SessionSnapshot;
use crate::state::AppState;

/// JSON request body.
///
/// Same as [`axum::Json`], but a body that fails to parse is reported as
/// [`AppError::BadRequest`] with the usual `{kind, message}` error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Response body of every data route.
///
/// `message` carries the success banner text, when there is one.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
    pub session: SessionSnapshot,
}

impl<T> Envelope<T> {
    pub fn new(data: T, navigator: &Navigator) -> Self {
        Self {
            message: None,
            data,
            session: navigator.snapshot(),
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Create the session navigator routes router.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(session::show))
        .route("/role", post(session::select_role))
        .route("/login", post(session::login))
        .route("/account/start", post(session::start_account))
        .route("/account", post(session::create_account))
        .route("/navigate", post(session::navigate))
        .route("/logout", post(session::logout))
}

/// Create the catalog routes router.
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(books::index).post(books::create))
        .route("/{id}", delete(books::destroy))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/session", session_routes())
        .route("/profile", get(profile::show).put(profile::update))
        .nest("/books", book_routes())
        .route("/orders", get(orders::index).post(orders::create))
        .route("/reviews", get(reviews::index).post(reviews::create))
}
