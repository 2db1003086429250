//! Order domain types.
//!
//! Orders are immutable snapshots taken at checkout; only `status` changes
//! afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use kiosk_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// A completed checkout.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub user_name: String,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A price-frozen order line.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    /// Unit price captured at checkout time.
    pub price: Decimal,
}

impl OrderItem {
    /// Line subtotal at the frozen unit price.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// An order together with its items.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_item_subtotal() {
        let item = OrderItem {
            id: OrderItemId::new(1),
            product_id: ProductId::new(1),
            product_name: "Desk Lamp".to_string(),
            quantity: 4,
            price: "12.50".parse().unwrap(),
        };
        assert_eq!(item.subtotal(), "50.00".parse().unwrap());
    }
}
