//! Shipping address models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use greenbasket_core::{AddressId, SubjectId};

/// A stored shipping address.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    #[serde(skip_serializing)]
    pub subject: SubjectId,
    pub full_name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The writable postal fields, shared by create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFields {
    pub full_name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone_number: String,
}

impl AddressFields {
    /// Check that no field is blank.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        ![
            &self.full_name,
            &self.street_address,
            &self.city,
            &self.state,
            &self.zip_code,
            &self.phone_number,
        ]
        .iter()
        .any(|field| field.trim().is_empty())
    }
}
