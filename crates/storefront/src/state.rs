//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::Gateway;
use crate::services::{CatalogService, IdentityService, OrderService, ReviewService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the shared record gateway and the per-request services built on it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    gateway: Arc<dyn Gateway>,
}

impl AppState {
    /// Create a new application state over a `PostgreSQL` or in-memory
    /// record gateway.
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { gateway }),
        }
    }

    /// Get a reference to the record gateway.
    #[must_use]
    pub fn gateway(&self) -> &dyn Gateway {
        self.inner.gateway.as_ref()
    }

    #[must_use]
    pub fn identity(&self) -> IdentityService<'_> {
        IdentityService::new(self.gateway())
    }

    #[must_use]
    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(self.gateway())
    }

    #[must_use]
    pub fn orders(&self) -> OrderService<'_> {
        OrderService::new(self.gateway())
    }

    #[must_use]
    pub fn reviews(&self) -> ReviewService<'_> {
        ReviewService::new(self.gateway())
    }
}
