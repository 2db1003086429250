//! Integration test helpers for Kiosk.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations and start the server
//! cargo run -p kiosk-cli -- migrate
//! cargo run -p kiosk-api
//!
//! # Run integration tests (ignored by default)
//! cargo test -p kiosk-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `KIOSK_API_BASE_URL` - API base URL (default: `http://localhost:8000`)
//! - `KIOSK_DATABASE_URL` / `DATABASE_URL` - Database for direct seeding and
//!   assertions

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use reqwest::Client;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("KIOSK_API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// Create an HTTP client with a cookie store for session handling.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Connect directly to the database for seeding and assertions.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("KIOSK_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("KIOSK_DATABASE_URL must be set for integration tests");

    PgPool::connect(&url)
        .await
        .expect("Failed to connect to test database")
}

/// Generate a unique name with the given prefix.
#[must_use]
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Register a user and log them in, returning the session-holding client.
pub async fn register_and_login(username: &str, password: &str) -> Client {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/users/register"))
        .json(&json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "first_name": "Test",
            "last_name": "User",
            "password": password,
            "password_confirm": password,
        }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), 201, "registration should succeed");

    let resp = client
        .post(format!("{base_url}/users/login"))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), 200, "login should succeed");

    client
}

/// Seed a category and product directly in the database.
///
/// Returns the product ID.
pub async fn seed_product(pool: &PgPool, price: &str, stock: i32) -> i32 {
    let (category_id,): (i32,) = sqlx::query_as(
        "INSERT INTO shop.categories (name, description) VALUES ($1, '') RETURNING id",
    )
    .bind(unique("category"))
    .fetch_one(pool)
    .await
    .expect("failed to seed category");

    let (product_id,): (i32,) = sqlx::query_as(
        "INSERT INTO shop.products (name, description, price, category_id, stock_quantity)
         VALUES ($1, '', $2::numeric, $3, $4)
         RETURNING id",
    )
    .bind(unique("product"))
    .bind(price)
    .bind(category_id)
    .bind(stock)
    .fetch_one(pool)
    .await
    .expect("failed to seed product");

    product_id
}

/// Read a product's current stock directly from the database.
pub async fn product_stock(pool: &PgPool, product_id: i32) -> i32 {
    let (stock,): (i32,) =
        sqlx::query_as("SELECT stock_quantity FROM shop.products WHERE id = $1")
            .bind(product_id)
            .fetch_one(pool)
            .await
            .expect("failed to read stock");
    stock
}

/// Set an order's status directly in the database.
pub async fn set_order_status(pool: &PgPool, order_id: i64, status: &str) {
    sqlx::query("UPDATE shop.orders SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(i32::try_from(order_id).unwrap())
        .execute(pool)
        .await
        .expect("failed to update order status");
}

/// Extract the `error` field from an error response body.
pub async fn error_message(resp: reqwest::Response) -> String {
    let body: Value = resp.json().await.expect("error body should be JSON");
    body.get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
