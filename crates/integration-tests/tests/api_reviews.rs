//! Integration tests for reviews and rating aggregates.
//!
//! Run with: cargo test -p kiosk-integration-tests -- --ignored

use serde_json::{Value, json};

use kiosk_integration_tests::{
    api_base_url, register_and_login, seed_product, set_order_status, test_pool, unique,
};

async fn post_review(client: &reqwest::Client, product_id: i32, rating: i32) -> reqwest::Response {
    client
        .post(format!("{}/reviews", api_base_url()))
        .json(&json!({
            "product": product_id,
            "rating": rating,
            "title": "Review title",
            "comment": "Review comment",
        }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_rating_bounds_enforced() {
    let pool = test_pool().await;
    let product_id = seed_product(&pool, "5.00", 10).await;
    let client = register_and_login(&unique("user"), "sturdy-password-1").await;

    for rating in [0, 6, -1] {
        let resp = post_review(&client, product_id, rating).await;
        assert_eq!(resp.status(), 400, "rating {rating} must be rejected");
    }

    let resp = post_review(&client, product_id, 5).await;
    assert_eq!(resp.status(), 201);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_duplicate_review_conflicts() {
    let pool = test_pool().await;
    let product_id = seed_product(&pool, "5.00", 10).await;
    let client = register_and_login(&unique("user"), "sturdy-password-1").await;

    assert_eq!(post_review(&client, product_id, 4).await.status(), 201);
    assert_eq!(post_review(&client, product_id, 5).await.status(), 409);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_rating_aggregates() {
    // Three reviewers rate 5, 3, 4 -> average 4.0, one review per bucket
    let pool = test_pool().await;
    let product_id = seed_product(&pool, "5.00", 10).await;
    let base_url = api_base_url();

    for rating in [5, 3, 4] {
        let client = register_and_login(&unique("reviewer"), "sturdy-password-1").await;
        assert_eq!(post_review(&client, product_id, rating).await.status(), 201);
    }

    let product: Value = reqwest::get(format!("{base_url}/products/{product_id}"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(product["average_rating"], 4.0);
    assert_eq!(product["review_count"], 3);
    assert_eq!(product["rating_distribution"]["5"], 1);
    assert_eq!(product["rating_distribution"]["4"], 1);
    assert_eq!(product["rating_distribution"]["3"], 1);
    assert_eq!(product["rating_distribution"]["2"], 0);
    assert_eq!(product["rating_distribution"]["1"], 0);
    assert_eq!(product["reviews"].as_array().unwrap().len(), 3);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_verified_purchase_flag() {
    let pool = test_pool().await;
    let product_id = seed_product(&pool, "5.00", 10).await;
    let client = register_and_login(&unique("buyer"), "sturdy-password-1").await;
    let base_url = api_base_url();

    client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .unwrap();

    let order: Value = client
        .post(format!("{base_url}/orders/create"))
        .json(&json!({ "shipping_address": "123 St" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // A pending order does not count as a purchase yet; processing does
    set_order_status(&pool, order["id"].as_i64().unwrap(), "processing").await;

    let resp = post_review(&client, product_id, 5).await;
    assert_eq!(resp.status(), 201);
    let review: Value = resp.json().await.unwrap();
    assert_eq!(review["is_verified_purchase"], true);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_unpurchased_review_is_not_verified() {
    let pool = test_pool().await;
    let product_id = seed_product(&pool, "5.00", 10).await;
    let client = register_and_login(&unique("user"), "sturdy-password-1").await;

    let resp = post_review(&client, product_id, 3).await;
    assert_eq!(resp.status(), 201);
    let review: Value = resp.json().await.unwrap();
    assert_eq!(review["is_verified_purchase"], false);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_foreign_review_is_not_found() {
    let pool = test_pool().await;
    let product_id = seed_product(&pool, "5.00", 10).await;
    let owner = register_and_login(&unique("owner"), "sturdy-password-1").await;
    let intruder = register_and_login(&unique("intruder"), "sturdy-password-1").await;
    let base_url = api_base_url();

    let resp = post_review(&owner, product_id, 4).await;
    let review: Value = resp.json().await.unwrap();
    let review_id = review["id"].as_i64().unwrap();

    let resp = intruder
        .put(format!("{base_url}/reviews/{review_id}"))
        .json(&json!({ "rating": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = intruder
        .delete(format!("{base_url}/reviews/{review_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Owner updates and deletes their own review
    let resp = owner
        .put(format!("{base_url}/reviews/{review_id}"))
        .json(&json!({ "rating": 2, "title": "Changed my mind" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["rating"], 2);
    assert_eq!(updated["title"], "Changed my mind");
    // Untouched fields keep their value
    assert_eq!(updated["comment"], "Review comment");

    let resp = owner
        .delete(format!("{base_url}/reviews/{review_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_user_reviews_listing() {
    let pool = test_pool().await;
    let first = seed_product(&pool, "5.00", 10).await;
    let second = seed_product(&pool, "7.00", 10).await;
    let client = register_and_login(&unique("user"), "sturdy-password-1").await;
    let base_url = api_base_url();

    assert_eq!(post_review(&client, first, 4).await.status(), 201);
    assert_eq!(post_review(&client, second, 2).await.status(), 201);

    let reviews: Value = client
        .get(format!("{base_url}/users/reviews"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(reviews.as_array().unwrap().len(), 2);
}
