//! Product route handlers.
//!
//! The catalog is public; submitting a rating requires authentication and a
//! delivered order containing the product.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use greenbasket_core::{OrderId, ProductCategory, ProductId};

use crate::db::{OrderRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::ProductView;
use crate::state::AppState;

/// Catalog filter query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Restrict results to one category.
    pub category: Option<ProductCategory>,
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
}

/// Rating submission body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRequest {
    pub order_id: OrderId,
    pub stars: i32,
}

/// List the catalog, optionally filtered by category and name search.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let products = ProductRepository::new(state.pool())
        .list(query.category, query.search.as_deref())
        .await?;

    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

/// Fetch a single product.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id} not found")))?;

    Ok(Json(ProductView::from(product)))
}

/// Submit a star rating for a product the caller bought.
///
/// The order must belong to the caller, contain the product, and already be
/// delivered. One rating per product per order.
pub async fn rate(
    State(state): State<AppState>,
    CurrentUser(subject): CurrentUser,
    Path(id): Path<ProductId>,
    Json(body): Json<RatingRequest>,
) -> Result<Json<ProductView>> {
    if !(1..=5).contains(&body.stars) {
        return Err(AppError::BadRequest(
            "stars must be between 1 and 5".to_string(),
        ));
    }

    let status = OrderRepository::new(state.pool())
        .status_for_product(&subject, body.order_id, id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("order {} with product {id} not found", body.order_id))
        })?;

    if !status.is_rateable() {
        return Err(AppError::BadRequest(
            "order must be delivered before rating".to_string(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .add_rating(&subject, body.order_id, id, body.stars)
        .await?;

    Ok(Json(ProductView::from(product)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_query_deserializes_category() {
        let query: CatalogQuery = serde_json::from_value(serde_json::json!({
            "category": "Electronics",
            "search": "head",
        }))
        .unwrap();
        assert_eq!(query.category, Some(ProductCategory::Electronics));
        assert_eq!(query.search.as_deref(), Some("head"));
    }

    #[test]
    fn test_catalog_query_all_optional() {
        let query: CatalogQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(query.category.is_none());
        assert!(query.search.is_none());
    }

    #[test]
    fn test_rating_request_uses_camel_case() {
        let body: RatingRequest =
            serde_json::from_str(r#"{"orderId": 7, "stars": 4}"#).unwrap();
        assert_eq!(body.order_id, OrderId::from(7));
        assert_eq!(body.stars, 4);
    }
}
