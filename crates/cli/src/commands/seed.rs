//! Catalog seeding command.
//!
//! Reads products from a YAML file (or the built-in fixture set), validates
//! them, and replaces the entire `product` table in one transaction. This is
//! destructive by design: the catalog after seeding is exactly the file's
//! contents.

use std::collections::BTreeSet;
use std::path::Path;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use greenbasket_api::db::{ProductRepository, SeedProduct};

use super::migrate::{self, MigrationError};

/// Built-in fixture catalog, used when no `--file` is given.
const DEFAULT_FIXTURES: &str = include_str!("../../fixtures/products.yaml");

/// Errors from the seed command.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read {0}: {1}")]
    Io(String, std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid fixture: {0}")]
    Validation(String),

    #[error(transparent)]
    Env(#[from] MigrationError),

    #[error("Database error: {0}")]
    Database(#[from] greenbasket_api::db::RepositoryError),

    #[error("Connection error: {0}")]
    Connect(#[from] sqlx::Error),
}

/// Replace the product catalog from a YAML file.
///
/// # Errors
///
/// Returns `SeedError` if the file is missing or malformed, a fixture fails
/// validation, or the database replace fails. Nothing is written unless every
/// fixture is valid.
pub async fn products(file_path: Option<&str>) -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    // Parse and validate before touching the database
    let content = match file_path {
        Some(path) => {
            if !Path::new(path).exists() {
                return Err(SeedError::FileNotFound(path.to_string()));
            }
            info!(path = %path, "Loading catalog from file");
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| SeedError::Io(path.to_string(), e))?
        }
        None => {
            info!("Loading built-in fixture catalog");
            DEFAULT_FIXTURES.to_string()
        }
    };

    let fixtures: Vec<SeedProduct> = serde_yaml::from_str(&content)?;
    validate(&fixtures)?;

    let categories: BTreeSet<String> = fixtures
        .iter()
        .map(|p| p.category.to_string())
        .collect();
    info!(
        products = fixtures.len(),
        categories = %categories.into_iter().collect::<Vec<_>>().join(", "),
        "Parsed catalog"
    );

    warn!("Replacing the entire product table");

    let database_url = migrate::database_url()?;
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let inserted = ProductRepository::new(&pool).replace_all(&fixtures).await?;

    info!(inserted, "Catalog seeded");
    Ok(())
}

/// Reject fixture files that would produce a broken catalog.
fn validate(fixtures: &[SeedProduct]) -> Result<(), SeedError> {
    if fixtures.is_empty() {
        return Err(SeedError::Validation(
            "fixture file contains no products".to_string(),
        ));
    }

    let mut names = BTreeSet::new();
    for product in fixtures {
        if product.name.trim().is_empty() {
            return Err(SeedError::Validation(
                "product name must not be empty".to_string(),
            ));
        }
        if !names.insert(product.name.as_str()) {
            return Err(SeedError::Validation(format!(
                "duplicate product name: {}",
                product.name
            )));
        }
        if product.price.is_sign_negative() || product.price.is_zero() {
            return Err(SeedError::Validation(format!(
                "{}: price must be positive",
                product.name
            )));
        }
        if product.stock < 0 {
            return Err(SeedError::Validation(format!(
                "{}: stock must not be negative",
                product.name
            )));
        }
    }

    Ok(())
}
