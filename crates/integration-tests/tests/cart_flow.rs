//! Integration tests for the cart and wishlist flows.
//!
//! These tests require:
//! - A running `PostgreSQL` database, migrated and seeded
//! - The API server running in dev-auth mode
//!   (`AUTH_DEV_SECRET` matching `GB_TEST_DEV_SECRET`)

use reqwest::StatusCode;
use serde_json::{Value, json};

use greenbasket_integration_tests::{api_base_url, client, dev_token};

/// Pick any product ID from the seeded catalog.
async fn any_product_id(client: &reqwest::Client, base_url: &str) -> i64 {
    let products: Vec<Value> = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Failed to parse products");

    products
        .first()
        .and_then(|p| p.get("id"))
        .and_then(Value::as_i64)
        .expect("seeded catalog should have at least one product")
}

#[tokio::test]
#[ignore = "Requires running API server in dev-auth mode"]
async fn test_cart_requires_auth() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to reach /cart");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await.expect("Failed to parse body");
    assert!(body.get("error").is_some());
}

#[tokio::test]
#[ignore = "Requires running API server in dev-auth mode"]
async fn test_cart_add_update_remove_flow() {
    let client = client();
    let base_url = api_base_url();
    let token = dev_token("user_cart_flow");

    let product_id = any_product_id(&client, &base_url).await;

    // Fresh subject starts with an empty cart
    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert_eq!(cart.get("itemCount").and_then(Value::as_i64), Some(0));

    // Add twice; the line's quantity accumulates
    for _ in 0..2 {
        let resp = client
            .post(format!("{base_url}/cart/items"))
            .bearer_auth(&token)
            .json(&json!({"productId": product_id, "quantity": 1}))
            .send()
            .await
            .expect("Failed to add to cart");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert_eq!(cart.get("itemCount").and_then(Value::as_i64), Some(2));
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));

    // Set the exact quantity
    let resp = client
        .put(format!("{base_url}/cart/items/{product_id}"))
        .bearer_auth(&token)
        .json(&json!({"quantity": 5}))
        .send()
        .await
        .expect("Failed to set quantity");
    assert_eq!(resp.status(), StatusCode::OK);
    let cart: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(cart.get("itemCount").and_then(Value::as_i64), Some(5));

    // Remove the line
    let resp = client
        .delete(format!("{base_url}/cart/items/{product_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to remove item");
    assert_eq!(resp.status(), StatusCode::OK);
    let cart: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(cart.get("itemCount").and_then(Value::as_i64), Some(0));
}

#[tokio::test]
#[ignore = "Requires running API server in dev-auth mode"]
async fn test_wishlist_rejects_duplicates() {
    let client = client();
    let base_url = api_base_url();
    let token = dev_token("user_wishlist_dup");

    let product_id = any_product_id(&client, &base_url).await;

    // Start clean in case of a previous run
    let _ = client
        .delete(format!("{base_url}/wishlist/{product_id}"))
        .bearer_auth(&token)
        .send()
        .await;

    let resp = client
        .post(format!("{base_url}/wishlist"))
        .bearer_auth(&token)
        .json(&json!({"productId": product_id}))
        .send()
        .await
        .expect("Failed to add wish");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base_url}/wishlist"))
        .bearer_auth(&token)
        .json(&json!({"productId": product_id}))
        .send()
        .await
        .expect("Failed to add wish");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Cleanup
    let resp = client
        .delete(format!("{base_url}/wishlist/{product_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to remove wish");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "Requires running API server in dev-auth mode"]
async fn test_carts_are_isolated_per_subject() {
    let client = client();
    let base_url = api_base_url();
    let product_id = any_product_id(&client, &base_url).await;

    let alice = dev_token("user_isolation_a");
    let bob = dev_token("user_isolation_b");

    let resp = client
        .post(format!("{base_url}/cart/items"))
        .bearer_auth(&alice)
        .json(&json!({"productId": product_id}))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let bobs_cart: Value = client
        .get(format!("{base_url}/cart"))
        .bearer_auth(&bob)
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert_eq!(bobs_cart.get("itemCount").and_then(Value::as_i64), Some(0));

    // Cleanup
    let resp = client
        .delete(format!("{base_url}/cart"))
        .bearer_auth(&alice)
        .send()
        .await
        .expect("Failed to clear cart");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
