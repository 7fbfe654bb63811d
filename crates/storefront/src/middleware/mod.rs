//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` or memory store)
//!
//! Handlers then extract a [`Navigator`] from the session.

pub mod auth;
pub mod session;

pub use auth::Navigator;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
