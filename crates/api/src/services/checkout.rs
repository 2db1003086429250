//! Checkout engine: turns a cart into an order.
//!
//! This is the only multi-entity mutation in the system, and the whole
//! sequence runs inside one database transaction: stock checks, the order
//! and item inserts, stock decrements, and the cart clear either all happen
//! or none of them do. Stock is taken with a conditional decrement
//! (`... SET stock_quantity = stock_quantity - $n WHERE stock_quantity >= $n`)
//! so concurrent checkouts of the same product serialize on the row and can
//! never drive stock negative.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use kiosk_core::{CartId, OrderItemId, OrderStatus, ProductId};

use crate::db::RepositoryError;
use crate::error::AppError;
use crate::models::order::{Order, OrderDetail, OrderItem};
use crate::models::session::CurrentUser;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No shipping address was provided.
    #[error("shipping address is required")]
    MissingAddress,

    /// The user's cart has no items.
    #[error("cart is empty")]
    EmptyCart,

    /// A product's stock doesn't cover the requested quantity.
    #[error("insufficient stock: {product}")]
    InsufficientStock {
        /// Name of the product that ran out.
        product: String,
    },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::MissingAddress => {
                Self::BadRequest("Shipping address is required".to_string())
            }
            CheckoutError::EmptyCart => Self::Conflict("Cart is empty".to_string()),
            CheckoutError::InsufficientStock { product } => {
                Self::Conflict(format!("insufficient stock: {product}"))
            }
            CheckoutError::Repository(e) => e.into(),
        }
    }
}

/// A cart line snapshotted at checkout time, at the product's current price.
#[derive(sqlx::FromRow)]
struct CheckoutLine {
    product_id: ProductId,
    product_name: String,
    quantity: i32,
    price: Decimal,
}

/// Order total: sum of line subtotals at the snapshotted prices.
fn order_total(lines: &[CheckoutLine]) -> Decimal {
    lines
        .iter()
        .map(|line| line.price * Decimal::from(line.quantity))
        .sum()
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order from the user's cart.
    ///
    /// On success the order is created with status `pending`, one item per
    /// cart line with the unit price frozen, product stock is decremented,
    /// and the cart is emptied.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingAddress` if the address is blank,
    /// `CheckoutError::EmptyCart` if there is nothing to order, and
    /// `CheckoutError::InsufficientStock` if any line exceeds available
    /// stock. On any failure the transaction rolls back and cart, stock,
    /// and orders are left exactly as they were.
    pub async fn create_order(
        &self,
        user: &CurrentUser,
        shipping_address: &str,
    ) -> Result<OrderDetail, CheckoutError> {
        let shipping_address = shipping_address.trim();
        if shipping_address.is_empty() {
            return Err(CheckoutError::MissingAddress);
        }

        let mut tx = self.pool.begin().await.map_err(RepositoryError::Database)?;

        let cart: Option<(CartId,)> = sqlx::query_as("SELECT id FROM shop.carts WHERE user_id = $1")
            .bind(user.id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some((cart_id,)) = cart else {
            return Err(CheckoutError::EmptyCart);
        };

        let lines = sqlx::query_as::<_, CheckoutLine>(
            "SELECT ci.product_id, p.name AS product_name, ci.quantity, p.price
             FROM shop.cart_items ci
             JOIN shop.products p ON ci.product_id = p.id
             WHERE ci.cart_id = $1
             ORDER BY ci.id",
        )
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // Take stock first: a conditional decrement per line. Zero rows
        // affected means the stock doesn't cover the line, and dropping the
        // transaction undoes every decrement taken so far.
        for line in &lines {
            let result = sqlx::query(
                "UPDATE shop.products
                 SET stock_quantity = stock_quantity - $1
                 WHERE id = $2 AND stock_quantity >= $1",
            )
            .bind(line.quantity)
            .bind(line.product_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(CheckoutError::InsufficientStock {
                    product: line.product_name.clone(),
                });
            }
        }

        let total_amount = order_total(&lines);

        #[derive(sqlx::FromRow)]
        struct InsertedOrder {
            id: kiosk_core::OrderId,
            created_at: chrono::DateTime<chrono::Utc>,
            updated_at: chrono::DateTime<chrono::Utc>,
        }

        let inserted = sqlx::query_as::<_, InsertedOrder>(
            "INSERT INTO shop.orders (user_id, total_amount, shipping_address)
             VALUES ($1, $2, $3)
             RETURNING id, created_at, updated_at",
        )
        .bind(user.id)
        .bind(total_amount)
        .bind(shipping_address)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let (item_id,): (OrderItemId,) = sqlx::query_as(
                "INSERT INTO shop.order_items (order_id, product_id, quantity, price)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id",
            )
            .bind(inserted.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.price)
            .fetch_one(&mut *tx)
            .await?;

            items.push(OrderItem {
                id: item_id,
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                price: line.price,
            });
        }

        sqlx::query("DELETE FROM shop.cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await.map_err(RepositoryError::Database)?;

        Ok(OrderDetail {
            order: Order {
                id: inserted.id,
                user_id: user.id,
                user_name: user.username.clone(),
                status: OrderStatus::Pending,
                total_amount,
                shipping_address: shipping_address.to_owned(),
                created_at: inserted.created_at,
                updated_at: inserted.updated_at,
            },
            items,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(name: &str, price: &str, quantity: i32) -> CheckoutLine {
        CheckoutLine {
            product_id: ProductId::new(1),
            product_name: name.to_string(),
            quantity,
            price: price.parse().unwrap(),
        }
    }

    #[test]
    fn test_order_total_sums_line_subtotals() {
        let lines = vec![line("Lamp", "19.99", 3), line("Mug", "4.25", 2)];
        assert_eq!(order_total(&lines), "68.47".parse().unwrap());
    }

    #[test]
    fn test_order_total_single_line() {
        // 3 units at the product's price
        let lines = vec![line("Lamp", "10.00", 3)];
        assert_eq!(order_total(&lines), "30.00".parse().unwrap());
    }

    #[test]
    fn test_order_total_empty() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }
}
