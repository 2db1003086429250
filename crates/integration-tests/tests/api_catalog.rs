//! Integration tests for public catalog browsing.
//!
//! Run with: cargo test -p kiosk-integration-tests -- --ignored

use serde_json::Value;

use kiosk_integration_tests::{api_base_url, seed_product, test_pool, unique};

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_categories_listing() {
    let pool = test_pool().await;
    let name = unique("category");
    sqlx::query("INSERT INTO shop.categories (name, description) VALUES ($1, 'test category')")
        .bind(&name)
        .execute(&pool)
        .await
        .unwrap();

    let categories: Value = reqwest::get(format!("{}/categories", api_base_url()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(
        categories
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c["name"] == Value::String(name.clone())),
        "seeded category should be listed"
    );
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_inactive_products_are_hidden() {
    let pool = test_pool().await;
    let product_id = seed_product(&pool, "5.00", 10).await;
    let base_url = api_base_url();

    let resp = reqwest::get(format!("{base_url}/products/{product_id}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    sqlx::query("UPDATE shop.products SET is_active = FALSE WHERE id = $1")
        .bind(product_id)
        .execute(&pool)
        .await
        .unwrap();

    // Deactivated products read as missing, on detail and listing alike
    let resp = reqwest::get(format!("{base_url}/products/{product_id}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let products: Value = reqwest::get(format!("{base_url}/products"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(
        !products
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p["id"].as_i64() == Some(i64::from(product_id))),
        "inactive product must not be listed"
    );
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_category_filter() {
    let pool = test_pool().await;
    let product_id = seed_product(&pool, "5.00", 10).await;
    let base_url = api_base_url();

    let (category_id,): (i32,) =
        sqlx::query_as("SELECT category_id FROM shop.products WHERE id = $1")
            .bind(product_id)
            .fetch_one(&pool)
            .await
            .unwrap();

    let products: Value = reqwest::get(format!("{base_url}/products?category={category_id}"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let listed = products.as_array().unwrap();
    assert_eq!(listed.len(), 1, "each seeded category holds one product");
    assert_eq!(listed[0]["id"].as_i64(), Some(i64::from(product_id)));
    assert_eq!(listed[0]["category"].as_i64(), Some(i64::from(category_id)));
}
