//! Address book route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use greenbasket_core::AddressId;

use crate::db::AddressRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Address, AddressFields};
use crate::state::AppState;

/// List the caller's saved addresses.
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(subject): CurrentUser,
) -> Result<Json<Vec<Address>>> {
    let addresses = AddressRepository::new(state.pool()).list(&subject).await?;
    Ok(Json(addresses))
}

/// Save a new address.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(subject): CurrentUser,
    Json(fields): Json<AddressFields>,
) -> Result<(StatusCode, Json<Address>)> {
    validate(&fields)?;

    let address = AddressRepository::new(state.pool())
        .create(&subject, &fields)
        .await?;

    Ok((StatusCode::CREATED, Json(address)))
}

/// Replace one of the caller's addresses.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(subject): CurrentUser,
    Path(id): Path<AddressId>,
    Json(fields): Json<AddressFields>,
) -> Result<Json<Address>> {
    validate(&fields)?;

    let address = AddressRepository::new(state.pool())
        .update(&subject, id, &fields)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound(format!("address {id} not found"))
            }
            other => other.into(),
        })?;

    Ok(Json(address))
}

/// Delete one of the caller's addresses.
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(subject): CurrentUser,
    Path(id): Path<AddressId>,
) -> Result<StatusCode> {
    AddressRepository::new(state.pool())
        .delete(&subject, id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound(format!("address {id} not found"))
            }
            other => other.into(),
        })?;

    Ok(StatusCode::NO_CONTENT)
}

fn validate(fields: &AddressFields) -> Result<()> {
    if fields.is_complete() {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "all address fields are required".to_string(),
        ))
    }
}
