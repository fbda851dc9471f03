//! Database operations for the Greenbasket API.
//!
//! # Tables
//!
//! - `product` - Catalog (seeded via `gb-cli seed products`)
//! - `cart` / `cart_item` - One cart per subject
//! - `wishlist_item` - Saved-for-later product references
//! - `address` - Shipping addresses
//! - `"order"` / `order_item` - Immutable checkout snapshots
//! - `product_rating` - Per-order product ratings feeding the aggregate on `product`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p greenbasket-cli -- migrate
//! ```
//!
//! All queries are runtime-checked (`sqlx::query_as`); repositories map rows
//! into `crate::models` structs and surface failures as [`RepositoryError`].

pub mod addresses;
pub mod carts;
pub mod orders;
pub mod products;
pub mod wishlists;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::AddressRepository;
pub use carts::CartRepository;
pub use orders::{NewOrderItem, OrderRepository};
pub use products::{ProductRepository, SeedProduct};
pub use wishlists::WishlistRepository;

/// Errors surfaced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The requested row does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness or referential constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value failed to parse back into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning unique violations into `Conflict`.
    pub(crate) fn from_sqlx(e: sqlx::Error, conflict_msg: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_msg.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
