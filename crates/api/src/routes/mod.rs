//! HTTP route handlers for the Kiosk API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database)
//!
//! # Auth & profile
//! POST /users/register             - Create an account
//! POST /users/login                - Establish a session
//! POST /users/logout               - End the session (auth)
//! GET  /users/profile              - Profile attributes (auth)
//! PUT  /users/profile              - Update profile attributes (auth)
//!
//! # Catalog (public, read-only)
//! GET  /products                   - Active products (?category={id})
//! GET  /products/{id}              - Product detail with reviews
//! GET  /categories                 - All categories
//!
//! # Cart (auth)
//! GET    /cart                     - The caller's cart
//! POST   /cart/add                 - Add a product
//! PUT    /cart/update/{item_id}    - Overwrite a line's quantity
//! DELETE /cart/remove/{item_id}    - Remove a line
//!
//! # Orders (auth)
//! GET  /orders                     - The caller's orders
//! POST /orders/create              - Checkout
//! GET  /orders/{id}                - One order
//!
//! # Reviews
//! GET    /products/{id}/reviews    - Reviews for a product (public)
//! POST   /reviews                  - Create a review (auth)
//! PUT    /reviews/{id}             - Update own review (auth)
//! DELETE /reviews/{id}             - Delete own review (auth)
//! GET    /users/reviews            - The caller's reviews (auth)
//! ```

pub mod cart;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the full API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Auth & profile
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/logout", post(users::logout))
        .route(
            "/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        // Catalog
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))
        .route("/categories", get(products::list_categories))
        // Cart
        .route("/cart", get(cart::get_cart))
        .route("/cart/add", post(cart::add_to_cart))
        .route("/cart/update/{item_id}", put(cart::update_cart_item))
        .route("/cart/remove/{item_id}", delete(cart::remove_from_cart))
        // Orders
        .route("/orders", get(orders::list_orders))
        .route("/orders/create", post(orders::create_order))
        .route("/orders/{id}", get(orders::get_order))
        // Reviews
        .route("/products/{id}/reviews", get(reviews::list_product_reviews))
        .route("/reviews", post(reviews::create_review))
        .route(
            "/reviews/{id}",
            put(reviews::update_review).delete(reviews::delete_review),
        )
        .route("/users/reviews", get(reviews::list_user_reviews))
}
