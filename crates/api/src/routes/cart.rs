//! Cart route handlers.
//!
//! All cart routes require authentication; the cart is keyed by the verified
//! subject, never by anything client-supplied.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use greenbasket_core::ProductId;

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::CartView;
use crate::state::AppState;

/// Body for adding a product to the cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

/// Body for setting a cart line's quantity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetQuantityRequest {
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Get the caller's cart. A subject who never added anything gets an empty
/// cart, not a 404.
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(subject): CurrentUser,
) -> Result<Json<CartView>> {
    let repo = CartRepository::new(state.pool());

    let Some(cart) = repo.get(&subject).await? else {
        return Ok(Json(CartView::empty()));
    };

    let items = repo.items_with_products(cart.id).await?;
    Ok(Json(CartView::from_items(cart.id, items)))
}

/// Add a product to the cart; re-adding increments the quantity.
pub async fn add_item(
    State(state): State<AppState>,
    CurrentUser(subject): CurrentUser,
    Json(body): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartView>)> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .get(body.product_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("product {} not found", body.product_id))
        })?;

    if !product.in_stock() {
        return Err(AppError::BadRequest(format!(
            "product {} is out of stock",
            product.id
        )));
    }

    let repo = CartRepository::new(state.pool());
    let cart = repo.get_or_create(&subject).await?;
    repo.add_item(cart.id, product.id, body.quantity).await?;

    let items = repo.items_with_products(cart.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(CartView::from_items(cart.id, items)),
    ))
}

/// Set a cart line's quantity to an exact value.
pub async fn set_quantity(
    State(state): State<AppState>,
    CurrentUser(subject): CurrentUser,
    Path(product_id): Path<ProductId>,
    Json(body): Json<SetQuantityRequest>,
) -> Result<Json<CartView>> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1; remove the item instead".to_string(),
        ));
    }

    let repo = CartRepository::new(state.pool());
    let cart = repo
        .get(&subject)
        .await?
        .ok_or_else(|| AppError::NotFound("cart is empty".to_string()))?;

    repo.set_quantity(cart.id, product_id, body.quantity)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound(format!("product {product_id} is not in the cart"))
            }
            other => other.into(),
        })?;

    let items = repo.items_with_products(cart.id).await?;
    Ok(Json(CartView::from_items(cart.id, items)))
}

/// Remove a product from the cart.
pub async fn remove_item(
    State(state): State<AppState>,
    CurrentUser(subject): CurrentUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartView>> {
    let repo = CartRepository::new(state.pool());
    let cart = repo
        .get(&subject)
        .await?
        .ok_or_else(|| AppError::NotFound("cart is empty".to_string()))?;

    repo.remove_item(cart.id, product_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound(format!("product {product_id} is not in the cart"))
            }
            other => other.into(),
        })?;

    let items = repo.items_with_products(cart.id).await?;
    Ok(Json(CartView::from_items(cart.id, items)))
}

/// Empty the cart. Idempotent: clearing a missing cart succeeds.
pub async fn clear(
    State(state): State<AppState>,
    CurrentUser(subject): CurrentUser,
) -> Result<StatusCode> {
    CartRepository::new(state.pool()).clear(&subject).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_item_request_defaults_quantity() {
        let body: AddItemRequest = serde_json::from_str(r#"{"productId": 3}"#).unwrap();
        assert_eq!(body.product_id, ProductId::from(3));
        assert_eq!(body.quantity, 1);
    }

    #[test]
    fn test_add_item_request_explicit_quantity() {
        let body: AddItemRequest =
            serde_json::from_str(r#"{"productId": 3, "quantity": 4}"#).unwrap();
        assert_eq!(body.quantity, 4);
    }
}
