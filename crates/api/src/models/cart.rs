//! Cart models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use greenbasket_core::{CartId, CartItemId, SubjectId};

use super::product::{Product, ProductView};

/// A cart row. One cart per subject, created lazily on first use.
#[derive(Debug, Clone, FromRow)]
pub struct Cart {
    pub id: CartId,
    pub subject: SubjectId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line joined with its product, as loaded by the repository.
#[derive(Debug, Clone, FromRow)]
pub struct CartItemWithProduct {
    pub item_id: CartItemId,
    pub quantity: i32,
    #[sqlx(flatten)]
    pub product: Product,
}

/// JSON view of a single cart line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub id: CartItemId,
    pub quantity: i32,
    pub product: ProductView,
}

/// JSON view of the whole cart, including the totals the client shows in
/// the sticky checkout bar.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub id: Option<CartId>,
    pub items: Vec<CartItemView>,
    pub item_count: i32,
    pub subtotal: Decimal,
}

impl CartView {
    /// An empty cart for subjects that have never added an item.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            id: None,
            items: Vec::new(),
            item_count: 0,
            subtotal: Decimal::ZERO,
        }
    }

    /// Build the view from joined rows, computing line totals.
    #[must_use]
    pub fn from_items(cart_id: CartId, rows: Vec<CartItemWithProduct>) -> Self {
        let mut item_count = 0;
        let mut subtotal = Decimal::ZERO;
        let items = rows
            .into_iter()
            .map(|row| {
                item_count += row.quantity;
                subtotal += row.product.price * Decimal::from(row.quantity);
                CartItemView {
                    id: row.item_id,
                    quantity: row.quantity,
                    product: ProductView::from(row.product),
                }
            })
            .collect();

        Self {
            id: Some(cart_id),
            items,
            item_count,
            subtotal,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use greenbasket_core::{ProductCategory, ProductId};

    fn row(item_id: i32, product_id: i32, price: Decimal, quantity: i32) -> CartItemWithProduct {
        CartItemWithProduct {
            item_id: CartItemId::new(item_id),
            quantity,
            product: Product {
                id: ProductId::new(product_id),
                name: format!("Product {product_id}"),
                description: String::new(),
                price,
                stock: 10,
                category: ProductCategory::Sports,
                images: Vec::new(),
                rating_count: 0,
                rating_sum: 0,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_empty_cart() {
        let view = CartView::empty();
        assert!(view.items.is_empty());
        assert_eq!(view.item_count, 0);
        assert_eq!(view.subtotal, Decimal::ZERO);
    }

    #[test]
    fn test_totals_sum_lines() {
        let view = CartView::from_items(
            CartId::new(1),
            vec![
                row(1, 10, Decimal::new(2_50, 2), 2), // 5.00
                row(2, 11, Decimal::new(10_00, 2), 3), // 30.00
            ],
        );
        assert_eq!(view.item_count, 5);
        assert_eq!(view.subtotal, Decimal::new(35_00, 2));
    }
}
