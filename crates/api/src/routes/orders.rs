//! Order route handlers.
//!
//! Checkout delegates to [`crate::services::checkout`]; reads are scoped to
//! the caller.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kiosk_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::auth::RequireAuth;
use crate::models::order::{OrderDetail, OrderItem};
use crate::services::checkout::CheckoutService;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Order line display data.
#[derive(Debug, Serialize)]
pub struct OrderItemView {
    pub id: OrderItemId,
    pub product: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub subtotal: Decimal,
}

impl From<OrderItem> for OrderItemView {
    fn from(item: OrderItem) -> Self {
        let subtotal = item.subtotal();
        Self {
            id: item.id,
            product: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            price: item.price,
            subtotal,
        }
    }
}

/// Order display data.
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub user: UserId,
    pub user_name: String,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub items: Vec<OrderItemView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderDetail> for OrderView {
    fn from(detail: OrderDetail) -> Self {
        Self {
            id: detail.order.id,
            user: detail.order.user_id,
            user_name: detail.order.user_name,
            status: detail.order.status,
            total_amount: detail.order.total_amount,
            shipping_address: detail.order.shipping_address,
            items: detail.items.into_iter().map(OrderItemView::from).collect(),
            created_at: detail.order.created_at,
            updated_at: detail.order.updated_at,
        }
    }
}

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub shipping_address: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /orders/create`
pub async fn create_order(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse> {
    let checkout = CheckoutService::new(state.pool());
    let detail = checkout.create_order(&user, &body.shipping_address).await?;

    tracing::info!(
        user_id = %user.id,
        order_id = %detail.order.id,
        total = %detail.order.total_amount,
        "order created"
    );

    Ok((StatusCode::CREATED, Json(OrderView::from(detail))))
}

/// `GET /orders`
pub async fn list_orders(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderView>>> {
    let orders = OrderRepository::new(state.pool());
    let details = orders.list_for_user(user.id).await?;

    Ok(Json(details.into_iter().map(OrderView::from).collect()))
}

/// `GET /orders/{id}`
pub async fn get_order(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<OrderView>> {
    let orders = OrderRepository::new(state.pool());

    // Another user's order is reported as missing, not forbidden
    let detail = orders.get_for_user(user.id, order_id).await?;

    Ok(Json(detail.into()))
}
