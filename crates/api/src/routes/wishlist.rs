//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use greenbasket_core::ProductId;

use crate::db::{ProductRepository, WishlistRepository};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::WishlistItemView;
use crate::state::AppState;

/// Body for adding a product to the wishlist.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWishRequest {
    pub product_id: ProductId,
}

/// List the caller's wishlist, newest first.
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(subject): CurrentUser,
) -> Result<Json<Vec<WishlistItemView>>> {
    let items = WishlistRepository::new(state.pool()).list(&subject).await?;

    Ok(Json(items.into_iter().map(WishlistItemView::from).collect()))
}

/// Add a product to the wishlist. Wishing the same product twice is a 409.
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(subject): CurrentUser,
    Json(body): Json<AddWishRequest>,
) -> Result<(StatusCode, Json<Vec<WishlistItemView>>)> {
    // Reject unknown products with a 404 instead of surfacing an FK error
    ProductRepository::new(state.pool())
        .get(body.product_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("product {} not found", body.product_id))
        })?;

    let repo = WishlistRepository::new(state.pool());
    repo.add(&subject, body.product_id).await?;

    let items = repo.list(&subject).await?;
    Ok((
        StatusCode::CREATED,
        Json(items.into_iter().map(WishlistItemView::from).collect()),
    ))
}

/// Remove a product from the wishlist.
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(subject): CurrentUser,
    Path(product_id): Path<ProductId>,
) -> Result<StatusCode> {
    WishlistRepository::new(state.pool())
        .remove(&subject, product_id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound(format!("product {product_id} is not in the wishlist"))
            }
            other => other.into(),
        })?;

    Ok(StatusCode::NO_CONTENT)
}
