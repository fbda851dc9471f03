//! Wishlist repository.

use sqlx::PgPool;

use greenbasket_core::{ProductId, SubjectId};

use super::RepositoryError;
use crate::models::WishlistItemWithProduct;

const WISHLIST_ITEM_COLUMNS: &str = "wi.id AS item_id, wi.created_at AS added_at, \
     p.id, p.name, p.description, p.price, p.stock, p.category, p.images, \
     p.rating_count, p.rating_sum, p.created_at, p.updated_at";

/// Repository for wishlist database operations.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the subject's wishlist with product data, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        subject: &SubjectId,
    ) -> Result<Vec<WishlistItemWithProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, WishlistItemWithProduct>(&format!(
            "SELECT {WISHLIST_ITEM_COLUMNS} \
             FROM wishlist_item wi \
             JOIN product p ON p.id = wi.product_id \
             WHERE wi.subject = $1 \
             ORDER BY wi.created_at DESC, wi.id DESC"
        ))
        .bind(subject)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Add a product to the subject's wishlist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product is already wished.
    pub async fn add(
        &self,
        subject: &SubjectId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO wishlist_item (subject, product_id) VALUES ($1, $2)")
            .bind(subject)
            .bind(product_id)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "product already in wishlist"))?;

        Ok(())
    }

    /// Remove a product from the subject's wishlist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not wished.
    pub async fn remove(
        &self,
        subject: &SubjectId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("DELETE FROM wishlist_item WHERE subject = $1 AND product_id = $2")
                .bind(subject)
                .bind(product_id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
