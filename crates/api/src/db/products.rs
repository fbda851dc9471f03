//! Product repository.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, QueryBuilder};

use greenbasket_core::{OrderId, ProductCategory, ProductId, SubjectId};

use super::RepositoryError;
use crate::models::Product;

/// Columns selected for every `Product` load.
const PRODUCT_COLUMNS: &str = "id, name, description, price, stock, category, images, \
     rating_count, rating_sum, created_at, updated_at";

/// A product fixture as parsed from the seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: ProductCategory,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, optionally filtered by category and a case-insensitive
    /// name substring.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        category: Option<ProductCategory>,
        search: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE TRUE"
        ));

        if let Some(category) = category {
            builder.push(" AND category = ");
            builder.push_bind(category);
        }
        if let Some(search) = search {
            builder.push(" AND name ILIKE ");
            builder.push_bind(format!("%{}%", escape_like(search)));
        }
        builder.push(" ORDER BY created_at DESC, id DESC");

        let products = builder
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Record a rating for a product and fold it into the aggregate.
    ///
    /// The rating row and the aggregate update share one transaction; the
    /// unique constraint on `(subject, order_id, product_id)` rejects a
    /// second rating for the same purchase.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if this purchase was already rated,
    /// `RepositoryError::NotFound` if the product no longer exists.
    pub async fn add_rating(
        &self,
        subject: &SubjectId,
        order_id: OrderId,
        product_id: ProductId,
        stars: i32,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO product_rating (subject, order_id, product_id, stars) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(subject)
        .bind(order_id)
        .bind(product_id)
        .bind(stars)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "product already rated for this order"))?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE product \
             SET rating_count = rating_count + 1, \
                 rating_sum = rating_sum + $2, \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(product_id)
        .bind(stars)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;

        Ok(product)
    }

    /// Destructively replace the whole catalog with the given fixtures.
    ///
    /// Used by `gb-cli seed products`: deletes every product (cascading to
    /// cart lines, wishlist entries and ratings) and inserts the fixture set
    /// in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction rolls back and the previous catalog survives.
    pub async fn replace_all(&self, products: &[SeedProduct]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM product").execute(&mut *tx).await?;

        let mut inserted = 0;
        for product in products {
            sqlx::query(
                "INSERT INTO product (name, description, price, stock, category, images) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.stock)
            .bind(product.category)
            .bind(&product.images)
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }

        tx.commit().await?;

        Ok(inserted)
    }
}

/// Escape `%` and `_` so user input can't act as LIKE wildcards.
fn escape_like(input: &str) -> String {
    input.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_seed_product_defaults() {
        let seed: SeedProduct = serde_yaml::from_str(
            "name: Yoga Mat\nprice: \"24.99\"\nstock: 12\ncategory: Sports\n",
        )
        .unwrap_or_else(|e| panic!("fixture should parse: {e}"));
        assert!(seed.description.is_empty());
        assert!(seed.images.is_empty());
        assert_eq!(seed.category, ProductCategory::Sports);
    }
}
