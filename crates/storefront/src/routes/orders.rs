//! Order route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use bookstore_core::{BookId, Capability, Order};

use super::{Envelope, JsonBody};
use crate::error::Result;
use crate::middleware::Navigator;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub book_id: BookId,
}

/// GET /orders
///
/// # Errors
///
/// Returns `NotAuthenticated` when logged out.
pub async fn index(
    State(state): State<AppState>,
    navigator: Navigator,
) -> Result<Json<Envelope<Vec<Order>>>> {
    let user = navigator.require_user()?;
    let orders = state.orders().list_orders(user.role, user.id).await?;
    Ok(Json(Envelope::new(orders, &navigator)))
}

/// POST /orders
///
/// The order price is the catalog price at the time of ordering.
///
/// # Errors
///
/// Returns `Forbidden` unless the role places orders and `BookNotFound` for
/// an unknown book.
pub async fn create(
    State(state): State<AppState>,
    navigator: Navigator,
    JsonBody(request): JsonBody<OrderRequest>,
) -> Result<(StatusCode, Json<Envelope<Order>>)> {
    let user = navigator.require(Capability::PlaceOrders)?;

    let book = state.catalog().book(request.book_id).await?;
    let order = state
        .orders()
        .place_order(user.id, book.id, book.price)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(order, &navigator).with_message("Book ordered successfully!")),
    ))
}
