//! Cart repository.
//!
//! One cart per subject, created lazily the first time an item is added.
//! Lines are unique per `(cart, product)`; re-adding a product increments
//! its quantity instead of duplicating the row.

use sqlx::PgPool;

use greenbasket_core::{CartId, ProductId, SubjectId};

use super::RepositoryError;
use crate::models::{Cart, CartItemWithProduct};

/// Joined columns for cart line loads: line fields aliased, product columns
/// flattened into [`crate::models::Product`].
const CART_ITEM_COLUMNS: &str = "ci.id AS item_id, ci.quantity, \
     p.id, p.name, p.description, p.price, p.stock, p.category, p.images, \
     p.rating_count, p.rating_sum, p.created_at, p.updated_at";

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the subject's cart, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, subject: &SubjectId) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            "SELECT id, subject, created_at, updated_at FROM cart WHERE subject = $1",
        )
        .bind(subject)
        .fetch_optional(self.pool)
        .await?;

        Ok(cart)
    }

    /// Get the subject's cart, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn get_or_create(&self, subject: &SubjectId) -> Result<Cart, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            "INSERT INTO cart (subject) VALUES ($1) \
             ON CONFLICT (subject) DO UPDATE SET updated_at = now() \
             RETURNING id, subject, created_at, updated_at",
        )
        .bind(subject)
        .fetch_one(self.pool)
        .await?;

        Ok(cart)
    }

    /// Load all cart lines with their products, oldest line first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_with_products(
        &self,
        cart_id: CartId,
    ) -> Result<Vec<CartItemWithProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartItemWithProduct>(&format!(
            "SELECT {CART_ITEM_COLUMNS} \
             FROM cart_item ci \
             JOIN product p ON p.id = ci.product_id \
             WHERE ci.cart_id = $1 \
             ORDER BY ci.created_at ASC, ci.id ASC"
        ))
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Add a product to the cart; increments quantity if already present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails (including a
    /// foreign-key violation for an unknown product).
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_item (cart_id, product_id, quantity) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (cart_id, product_id) \
             DO UPDATE SET quantity = cart_item.quantity + EXCLUDED.quantity",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        self.touch(cart_id).await
    }

    /// Set a cart line's quantity to an exact value (idempotent).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not in the cart.
    pub async fn set_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_item SET quantity = $3 WHERE cart_id = $1 AND product_id = $2",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.touch(cart_id).await
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not in the cart.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("DELETE FROM cart_item WHERE cart_id = $1 AND product_id = $2")
                .bind(cart_id)
                .bind(product_id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.touch(cart_id).await
    }

    /// Remove every line from the subject's cart. A missing cart is fine.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(&self, subject: &SubjectId) -> Result<(), RepositoryError> {
        sqlx::query(
            "DELETE FROM cart_item \
             WHERE cart_id IN (SELECT id FROM cart WHERE subject = $1)",
        )
        .bind(subject)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Bump the cart's `updated_at` after a line mutation.
    async fn touch(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE cart SET updated_at = now() WHERE id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
