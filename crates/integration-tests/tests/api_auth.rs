//! Integration tests for registration, login, and profile.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p kiosk-api)
//!
//! Run with: cargo test -p kiosk-integration-tests -- --ignored

use serde_json::{Value, json};

use kiosk_integration_tests::{api_base_url, client, register_and_login, unique};

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_register_login_logout_flow() {
    let username = unique("user");
    let client = register_and_login(&username, "sturdy-password-1").await;
    let base_url = api_base_url();

    // Logged-in users can see their cart
    let resp = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .post(format!("{base_url}/users/logout"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Session is gone after logout
    let resp = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_register_rejects_password_mismatch() {
    let base_url = api_base_url();

    let resp = client()
        .post(format!("{base_url}/users/register"))
        .json(&json!({
            "username": unique("user"),
            "email": "mismatch@example.com",
            "password": "sturdy-password-1",
            "password_confirm": "different-password",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_register_rejects_short_password() {
    let base_url = api_base_url();

    let resp = client()
        .post(format!("{base_url}/users/register"))
        .json(&json!({
            "username": unique("user"),
            "email": "short@example.com",
            "password": "short",
            "password_confirm": "short",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_register_duplicate_username_conflicts() {
    let base_url = api_base_url();
    let username = unique("user");

    let body = json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "sturdy-password-1",
        "password_confirm": "sturdy-password-1",
    });

    let resp = client()
        .post(format!("{base_url}/users/register"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let resp = client()
        .post(format!("{base_url}/users/register"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_login_wrong_password_unauthorized() {
    let base_url = api_base_url();
    let username = unique("user");
    let _ = register_and_login(&username, "sturdy-password-1").await;

    let resp = client()
        .post(format!("{base_url}/users/login"))
        .json(&json!({ "username": username, "password": "wrong-password" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_profile_roundtrip() {
    let base_url = api_base_url();
    let username = unique("user");
    let client = register_and_login(&username, "sturdy-password-1").await;

    // Fresh accounts have an empty profile
    let resp = client
        .get(format!("{base_url}/users/profile"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["username"], Value::String(username.clone()));
    assert!(body["phone_number"].is_null());

    let resp = client
        .put(format!("{base_url}/users/profile"))
        .json(&json!({
            "phone_number": "+1 555 0100",
            "address": "123 St",
            "date_of_birth": "1990-04-01",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["phone_number"], "+1 555 0100");
    assert_eq!(body["date_of_birth"], "1990-04-01");
}
