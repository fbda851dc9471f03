//! Wishlist models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use greenbasket_core::WishlistItemId;

use super::product::{Product, ProductView};

/// A wishlist entry joined with its product, as loaded by the repository.
#[derive(Debug, Clone, FromRow)]
pub struct WishlistItemWithProduct {
    pub item_id: WishlistItemId,
    pub added_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub product: Product,
}

/// JSON view of a wishlist entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemView {
    pub id: WishlistItemId,
    pub added_at: DateTime<Utc>,
    pub product: ProductView,
}

impl From<WishlistItemWithProduct> for WishlistItemView {
    fn from(row: WishlistItemWithProduct) -> Self {
        Self {
            id: row.item_id,
            added_at: row.added_at,
            product: ProductView::from(row.product),
        }
    }
}
