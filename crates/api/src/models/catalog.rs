//! Catalog domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use kiosk_core::{CategoryId, ProductId};

/// A product category.
#[derive(Debug, Clone)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A catalog product.
///
/// `category_name` is denormalized at query time so single-product reads
/// don't need a second round trip.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: CategoryId,
    pub category_name: String,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
