//! Cart route handlers.
//!
//! All operations require authentication and act on the caller's own cart.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use kiosk_core::{CartId, CartItemId, ProductId};

use crate::db::{CartRepository, CatalogRepository};
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::models::cart::{CartDetail, CartItem};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data.
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub id: CartItemId,
    pub product: ProductId,
    pub product_name: String,
    pub product_price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
}

impl From<CartItem> for CartItemView {
    fn from(item: CartItem) -> Self {
        let subtotal = item.subtotal();
        Self {
            id: item.id,
            product: item.product_id,
            product_name: item.product_name,
            product_price: item.product_price,
            quantity: item.quantity,
            subtotal,
        }
    }
}

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub id: CartId,
    pub items: Vec<CartItemView>,
    pub total_price: Decimal,
    pub total_items: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CartDetail> for CartView {
    fn from(detail: CartDetail) -> Self {
        let total_price = detail.total_price();
        let total_items = detail.total_items();
        Self {
            id: detail.cart.id,
            items: detail.items.into_iter().map(CartItemView::from).collect(),
            total_price,
            total_items,
            created_at: detail.cart.created_at,
            updated_at: detail.cart.updated_at,
        }
    }
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Cart item update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /cart`
pub async fn get_cart(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<CartView>> {
    let carts = CartRepository::new(state.pool());

    let cart = carts.get_or_create(user.id).await?;
    let items = carts.items(cart.id).await?;

    Ok(Json(CartDetail { cart, items }.into()))
}

/// `POST /cart/add`
pub async fn add_to_cart(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<AddToCartRequest>,
) -> Result<impl IntoResponse> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let catalog = CatalogRepository::new(state.pool());
    let carts = CartRepository::new(state.pool());

    // Inactive products can't be added, same as missing ones
    let product = catalog
        .get_active_product(body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let cart = carts.get_or_create(user.id).await?;
    carts.add_item(cart.id, product.id, body.quantity).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Item added to cart successfully" })),
    ))
}

/// `PUT /cart/update/{item_id}`
///
/// A quantity of zero removes the line; negative quantities are rejected.
pub async fn update_cart_item(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(item_id): Path<CartItemId>,
    Json(body): Json<UpdateCartItemRequest>,
) -> Result<impl IntoResponse> {
    if body.quantity < 0 {
        return Err(AppError::BadRequest(
            "Quantity cannot be negative".to_string(),
        ));
    }

    let carts = CartRepository::new(state.pool());

    if body.quantity == 0 {
        carts.remove_item(user.id, item_id).await?;
        return Ok(Json(json!({ "message": "Item removed from cart" })));
    }

    carts.update_item(user.id, item_id, body.quantity).await?;

    Ok(Json(json!({ "message": "Cart item updated successfully" })))
}

/// `DELETE /cart/remove/{item_id}`
pub async fn remove_from_cart(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(item_id): Path<CartItemId>,
) -> Result<impl IntoResponse> {
    let carts = CartRepository::new(state.pool());
    carts.remove_item(user.id, item_id).await?;

    Ok(Json(json!({ "message": "Item removed from cart" })))
}
