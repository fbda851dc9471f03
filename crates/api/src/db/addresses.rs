//! Address repository.
//!
//! Every query is scoped to the owning subject so one user can never read
//! or mutate another user's addresses.

use sqlx::PgPool;

use greenbasket_core::{AddressId, SubjectId};

use super::RepositoryError;
use crate::models::{Address, AddressFields};

const ADDRESS_COLUMNS: &str = "id, subject, full_name, street_address, city, state, \
     zip_code, phone_number, created_at, updated_at";

/// Repository for address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the subject's addresses, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, subject: &SubjectId) -> Result<Vec<Address>, RepositoryError> {
        let addresses = sqlx::query_as::<_, Address>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM address \
             WHERE subject = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(subject)
        .fetch_all(self.pool)
        .await?;

        Ok(addresses)
    }

    /// Create an address for the subject.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        subject: &SubjectId,
        fields: &AddressFields,
    ) -> Result<Address, RepositoryError> {
        let address = sqlx::query_as::<_, Address>(&format!(
            "INSERT INTO address \
                 (subject, full_name, street_address, city, state, zip_code, phone_number) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(subject)
        .bind(&fields.full_name)
        .bind(&fields.street_address)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.zip_code)
        .bind(&fields.phone_number)
        .fetch_one(self.pool)
        .await?;

        Ok(address)
    }

    /// Update one of the subject's addresses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist or
    /// belongs to another subject.
    pub async fn update(
        &self,
        subject: &SubjectId,
        id: AddressId,
        fields: &AddressFields,
    ) -> Result<Address, RepositoryError> {
        let address = sqlx::query_as::<_, Address>(&format!(
            "UPDATE address \
             SET full_name = $3, street_address = $4, city = $5, state = $6, \
                 zip_code = $7, phone_number = $8, updated_at = now() \
             WHERE id = $1 AND subject = $2 \
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(id)
        .bind(subject)
        .bind(&fields.full_name)
        .bind(&fields.street_address)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.zip_code)
        .bind(&fields.phone_number)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(address)
    }

    /// Delete one of the subject's addresses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist or
    /// belongs to another subject.
    pub async fn delete(
        &self,
        subject: &SubjectId,
        id: AddressId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM address WHERE id = $1 AND subject = $2")
            .bind(id)
            .bind(subject)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
