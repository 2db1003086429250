//! Integration tests for cart management.
//!
//! Run with: cargo test -p kiosk-integration-tests -- --ignored

use serde_json::{Value, json};

use kiosk_integration_tests::{
    api_base_url, register_and_login, seed_product, test_pool, unique,
};

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_add_and_total() {
    let pool = test_pool().await;
    let product_id = seed_product(&pool, "19.99", 50).await;
    let client = register_and_login(&unique("user"), "sturdy-password-1").await;
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(cart["total_items"], 3);
    assert_eq!(cart["total_price"], "59.97");
    assert_eq!(cart["items"][0]["subtotal"], "59.97");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_add_same_product_increments_quantity() {
    let pool = test_pool().await;
    let product_id = seed_product(&pool, "5.00", 50).await;
    let client = register_and_login(&unique("user"), "sturdy-password-1").await;
    let base_url = api_base_url();

    for _ in 0..2 {
        let resp = client
            .post(format!("{base_url}/cart/add"))
            .json(&json!({ "product_id": product_id, "quantity": 2 }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
    }

    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // One line, quantity four
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["quantity"], 4);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_add_rejects_bad_input() {
    let pool = test_pool().await;
    let product_id = seed_product(&pool, "5.00", 50).await;
    let client = register_and_login(&unique("user"), "sturdy-password-1").await;
    let base_url = api_base_url();

    // Zero quantity
    let resp = client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Unknown product
    let resp = client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "product_id": 99_999_999, "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_update_zero_removes_negative_rejected() {
    let pool = test_pool().await;
    let product_id = seed_product(&pool, "5.00", 50).await;
    let client = register_and_login(&unique("user"), "sturdy-password-1").await;
    let base_url = api_base_url();

    client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .unwrap();

    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let item_id = cart["items"][0]["id"].as_i64().unwrap();

    // Negative is rejected outright
    let resp = client
        .put(format!("{base_url}/cart/update/{item_id}"))
        .json(&json!({ "quantity": -1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Zero removes the line
    let resp = client
        .put(format!("{base_url}/cart/update/{item_id}"))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["total_items"], 0);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_foreign_cart_item_is_not_found() {
    let pool = test_pool().await;
    let product_id = seed_product(&pool, "5.00", 50).await;
    let owner = register_and_login(&unique("owner"), "sturdy-password-1").await;
    let intruder = register_and_login(&unique("intruder"), "sturdy-password-1").await;
    let base_url = api_base_url();

    owner
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .unwrap();

    let cart: Value = owner
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let item_id = cart["items"][0]["id"].as_i64().unwrap();

    // Another user's item reads as missing, both for update and delete
    let resp = intruder
        .put(format!("{base_url}/cart/update/{item_id}"))
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = intruder
        .delete(format!("{base_url}/cart/remove/{item_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // The owner's line is untouched
    let cart: Value = owner
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["items"][0]["quantity"], 1);
}
