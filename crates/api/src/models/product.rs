//! Product catalog models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use greenbasket_core::{ProductCategory, ProductId};

/// A catalog product row.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: ProductCategory,
    pub images: Vec<String>,
    pub rating_count: i32,
    pub rating_sum: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Average star rating, `None` until the first rating lands.
    #[must_use]
    pub fn rating_average(&self) -> Option<Decimal> {
        if self.rating_count == 0 {
            return None;
        }
        Some(
            (Decimal::from(self.rating_sum) / Decimal::from(self.rating_count))
                .round_dp(1),
        )
    }

    /// Whether the product can currently be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// JSON view of a product as the mobile client renders it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: ProductCategory,
    pub images: Vec<String>,
    pub rating_count: i32,
    pub rating_average: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let rating_average = product.rating_average();
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            category: product.category,
            images: product.images,
            rating_count: product.rating_count,
            rating_average,
            created_at: product.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(rating_count: i32, rating_sum: i32, stock: i32) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Wireless Headphones".to_string(),
            description: String::new(),
            price: Decimal::new(199_900, 2),
            stock,
            category: ProductCategory::Electronics,
            images: vec!["https://img.example.com/headphones.jpg".to_string()],
            rating_count,
            rating_sum,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_rating_average_unrated() {
        assert_eq!(product(0, 0, 5).rating_average(), None);
    }

    #[test]
    fn test_rating_average_rounds_to_one_decimal() {
        // 4 + 5 + 5 = 14 over 3 ratings = 4.666... -> 4.7
        let avg = product(3, 14, 5).rating_average().unwrap();
        assert_eq!(avg, Decimal::new(47, 1));
    }

    #[test]
    fn test_in_stock() {
        assert!(product(0, 0, 1).in_stock());
        assert!(!product(0, 0, 0).in_stock());
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let view = ProductView::from(product(2, 9, 3));
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("ratingCount").is_some());
        assert!(json.get("ratingAverage").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("rating_count").is_none());
    }
}
