//! Order repository.
//!
//! Checkout is one transaction: insert the order snapshot, insert its lines,
//! clear the buyer's cart. Either all of it happens or none of it does.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;

use greenbasket_core::{OrderId, OrderStatus, ProductId, SubjectId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderView, ShippingAddress};

const ORDER_COLUMNS: &str = "id, subject, shipping_full_name, shipping_street_address, \
     shipping_city, shipping_state, shipping_zip_code, shipping_phone_number, \
     total_price, payment_result, status, created_at";

const ORDER_ITEM_COLUMNS: &str = "id, order_id, product_id, name, price, quantity, image";

/// A validated order line ready to snapshot.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Option<ProductId>,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image: String,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order: insert the snapshot and clear the buyer's cart in a
    /// single transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing
    /// is persisted in that case.
    pub async fn create(
        &self,
        subject: &SubjectId,
        shipping: &ShippingAddress,
        items: &[NewOrderItem],
        total_price: Decimal,
        payment_result: Option<&serde_json::Value>,
    ) -> Result<OrderView, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO \"order\" \
                 (subject, shipping_full_name, shipping_street_address, shipping_city, \
                  shipping_state, shipping_zip_code, shipping_phone_number, \
                  total_price, payment_result) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(subject)
        .bind(&shipping.full_name)
        .bind(&shipping.street_address)
        .bind(&shipping.city)
        .bind(&shipping.state)
        .bind(&shipping.zip_code)
        .bind(&shipping.phone_number)
        .bind(total_price)
        .bind(payment_result)
        .fetch_one(&mut *tx)
        .await?;

        let mut order_items = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, OrderItem>(&format!(
                "INSERT INTO order_item (order_id, product_id, name, price, quantity, image) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 RETURNING {ORDER_ITEM_COLUMNS}"
            ))
            .bind(order.id)
            .bind(item.product_id)
            .bind(&item.name)
            .bind(item.price)
            .bind(item.quantity)
            .bind(&item.image)
            .fetch_one(&mut *tx)
            .await?;
            order_items.push(row);
        }

        // Placing the order consumes the cart
        sqlx::query(
            "DELETE FROM cart_item \
             WHERE cart_id IN (SELECT id FROM cart WHERE subject = $1)",
        )
        .bind(subject)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(OrderView::from_parts(order, order_items))
    }

    /// List the subject's orders with items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, subject: &SubjectId) -> Result<Vec<OrderView>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM \"order\" \
             WHERE subject = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(subject)
        .fetch_all(self.pool)
        .await?;

        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = orders.iter().map(|o| o.id.as_i32()).collect();
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_item \
             WHERE order_id = ANY($1) ORDER BY id ASC"
        ))
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                OrderView::from_parts(order, items)
            })
            .collect())
    }

    /// Status of the subject's order, provided it contains the product.
    ///
    /// Used to gate ratings: returns `None` if the order doesn't exist,
    /// belongs to someone else, or never included the product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn status_for_product(
        &self,
        subject: &SubjectId,
        order_id: OrderId,
        product_id: ProductId,
    ) -> Result<Option<OrderStatus>, RepositoryError> {
        let status = sqlx::query_scalar::<_, OrderStatus>(
            "SELECT o.status FROM \"order\" o \
             JOIN order_item oi ON oi.order_id = o.id \
             WHERE o.id = $1 AND o.subject = $2 AND oi.product_id = $3 \
             LIMIT 1",
        )
        .bind(order_id)
        .bind(subject)
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(status)
    }
}
