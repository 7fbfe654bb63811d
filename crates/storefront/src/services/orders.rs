//! Order service.
//!
//! Orders are created once and never change status.

use bookstore_core::{
    BookId, Capability, Order, OrderId, OrderStatus, Price, UserId, UserType, policy,
};

use super::{ServiceError, today};
use crate::db::{Gateway, Sequence};

/// Order operations for one request.
pub struct OrderService<'a> {
    gateway: &'a dyn Gateway,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(gateway: &'a dyn Gateway) -> Self {
        Self { gateway }
    }

    /// Record a purchase of `book_id` at `price`, dated today.
    ///
    /// Any number of orders per user and book is allowed.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if the gateway fails.
    pub async fn place_order(
        &self,
        user_id: UserId,
        book_id: BookId,
        price: Price,
    ) -> Result<Order, ServiceError> {
        let id = self.gateway.next_id(Sequence::Orders).await?;
        let order = Order {
            id: OrderId::new(id),
            user_id,
            book_id,
            order_date: today(),
            price,
            status: OrderStatus::Processing,
        };
        self.gateway.insert_order(&order).await?;

        tracing::info!(order_id = %order.id, user_id = %user_id, book_id = %book_id, "Order placed");
        Ok(order)
    }

    /// Orders visible to `role`: every order for roles that may view all,
    /// otherwise only `user_id`'s own.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if the gateway fails.
    pub async fn list_orders(
        &self,
        role: UserType,
        user_id: UserId,
    ) -> Result<Vec<Order>, ServiceError> {
        let owner = (!policy(role).can(Capability::ViewAllOrders)).then_some(user_id);
        Ok(self.gateway.list_orders(owner).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::MemoryGateway;

    fn price() -> Price {
        Price::new(Decimal::new(1250, 2)).unwrap()
    }

    #[tokio::test]
    async fn test_place_order_creates_one_processing_order() {
        let gateway = MemoryGateway::new();
        let orders = OrderService::new(&gateway);

        let order = orders
            .place_order(UserId::new(42), BookId::new(3), price())
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.order_date, today());
        assert_eq!(order.price, price());

        let all = orders.list_orders(UserType::Admin, UserId::new(1)).await.unwrap();
        assert_eq!(all, vec![order]);
    }

    #[tokio::test]
    async fn test_same_book_can_be_ordered_twice() {
        let gateway = MemoryGateway::new();
        let orders = OrderService::new(&gateway);

        let first = orders
            .place_order(UserId::new(42), BookId::new(3), price())
            .await
            .unwrap();
        let second = orders
            .place_order(UserId::new(42), BookId::new(3), price())
            .await
            .unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_customer_sees_only_own_orders() {
        let gateway = MemoryGateway::new();
        let orders = OrderService::new(&gateway);
        for user in [42, 7, 42] {
            orders
                .place_order(UserId::new(user), BookId::new(1), price())
                .await
                .unwrap();
        }

        let mine = orders
            .list_orders(UserType::Customer, UserId::new(42))
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|o| o.user_id == UserId::new(42)));

        let all = orders.list_orders(UserType::Admin, UserId::new(99)).await.unwrap();
        assert_eq!(all.len(), 3);
    }
}
