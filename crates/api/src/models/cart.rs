//! Cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use kiosk_core::{CartId, CartItemId, ProductId, UserId};

/// A user's shopping cart (1:1 with the user).
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line in a cart, joined with the product it references.
#[derive(Debug, Clone)]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_price: Decimal,
    pub quantity: i32,
}

impl CartItem {
    /// Line subtotal at the product's current price.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product_price * Decimal::from(self.quantity)
    }
}

/// A cart together with its items.
#[derive(Debug, Clone)]
pub struct CartDetail {
    pub cart: Cart,
    pub items: Vec<CartItem>,
}

impl CartDetail {
    /// Sum of line subtotals.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|item| i64::from(item.quantity)).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use kiosk_core::{CartId, UserId};

    fn item(id: i32, price: &str, quantity: i32) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            product_id: ProductId::new(id),
            product_name: format!("Product {id}"),
            product_price: price.parse().unwrap(),
            quantity,
        }
    }

    fn detail(items: Vec<CartItem>) -> CartDetail {
        CartDetail {
            cart: Cart {
                id: CartId::new(1),
                user_id: UserId::new(1),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            items,
        }
    }

    #[test]
    fn test_subtotal() {
        assert_eq!(item(1, "19.99", 3).subtotal(), "59.97".parse().unwrap());
    }

    #[test]
    fn test_totals() {
        let cart = detail(vec![item(1, "19.99", 3), item(2, "5.00", 2)]);
        assert_eq!(cart.total_price(), "69.97".parse().unwrap());
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = detail(vec![]);
        assert_eq!(cart.total_price(), Decimal::ZERO);
        assert_eq!(cart.total_items(), 0);
    }
}
