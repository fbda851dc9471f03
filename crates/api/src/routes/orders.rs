//! Order route handlers.
//!
//! Checkout trusts nothing price-shaped from the client: item prices come
//! from the catalog and the total is recomputed server-side. A client-sent
//! total is only checked against the server's figure so a stale cart surfaces
//! as a 400 instead of a silently different charge.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use greenbasket_core::ProductId;

use crate::db::{NewOrderItem, OrderRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{OrderView, ShippingAddress};
use crate::pricing::{self, PricedLine};
use crate::state::AppState;

/// One requested order line. Quantity comes from the client; price, name and
/// image are snapshotted from the catalog.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Checkout request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_items: Vec<OrderItemRequest>,
    pub shipping_address: ShippingAddress,
    /// The total the client displayed; rejected if it disagrees with the
    /// server's computation.
    pub total_price: Option<Decimal>,
    /// Gateway payload for prepaid orders; `null`/absent means cash on
    /// delivery.
    #[serde(default)]
    pub payment_result: Option<serde_json::Value>,
}

/// List the caller's orders, newest first.
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(subject): CurrentUser,
) -> Result<Json<Vec<OrderView>>> {
    let orders = OrderRepository::new(state.pool()).list(&subject).await?;
    Ok(Json(orders))
}

/// Place an order and clear the caller's cart.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(subject): CurrentUser,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderView>)> {
    if body.order_items.is_empty() {
        return Err(AppError::BadRequest(
            "order must contain at least one item".to_string(),
        ));
    }
    if let Some(shipping_err) = shipping_error(&body.shipping_address) {
        return Err(AppError::BadRequest(shipping_err));
    }

    let products = ProductRepository::new(state.pool());
    let mut items = Vec::with_capacity(body.order_items.len());
    let mut lines = Vec::with_capacity(body.order_items.len());

    for requested in &body.order_items {
        if requested.quantity < 1 {
            return Err(AppError::BadRequest(
                "item quantity must be at least 1".to_string(),
            ));
        }

        let product = products.get(requested.product_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("product {} not found", requested.product_id))
        })?;

        lines.push(PricedLine {
            unit_price: product.price,
            quantity: requested.quantity,
        });
        items.push(NewOrderItem {
            product_id: Some(product.id),
            name: product.name,
            price: product.price,
            quantity: requested.quantity,
            image: product.images.first().cloned().unwrap_or_default(),
        });
    }

    let totals = pricing::compute_totals(&lines);
    if let Some(client_total) = body.total_price {
        if !pricing::totals_match(client_total, totals.total) {
            return Err(AppError::BadRequest(format!(
                "total mismatch: expected {}, got {client_total}",
                totals.total
            )));
        }
    }

    let order = OrderRepository::new(state.pool())
        .create(
            &subject,
            &body.shipping_address,
            &items,
            totals.total,
            body.payment_result.as_ref(),
        )
        .await?;

    tracing::info!(
        order_id = %order.id,
        items = items.len(),
        total = %totals.total,
        "Order placed"
    );

    Ok((StatusCode::CREATED, Json(order)))
}

fn shipping_error(address: &ShippingAddress) -> Option<String> {
    let blank = [
        ("fullName", &address.full_name),
        ("streetAddress", &address.street_address),
        ("city", &address.city),
        ("state", &address.state),
        ("zipCode", &address.zip_code),
        ("phoneNumber", &address.phone_number),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty())?;

    Some(format!("shipping address field {} is required", blank.0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shipping() -> ShippingAddress {
        ShippingAddress {
            full_name: "Asha Rao".to_string(),
            street_address: "14 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            zip_code: "560001".to_string(),
            phone_number: "+91 98450 00000".to_string(),
        }
    }

    #[test]
    fn test_shipping_error_reports_first_blank_field() {
        let mut address = shipping();
        address.city = "  ".to_string();
        assert_eq!(
            shipping_error(&address).unwrap(),
            "shipping address field city is required"
        );
    }

    #[test]
    fn test_shipping_error_passes_complete_address() {
        assert!(shipping_error(&shipping()).is_none());
    }

    #[test]
    fn test_create_order_request_cod_defaults() {
        let body: CreateOrderRequest = serde_json::from_value(serde_json::json!({
            "orderItems": [{"productId": 2, "quantity": 1}],
            "shippingAddress": {
                "fullName": "Asha Rao",
                "streetAddress": "14 MG Road",
                "city": "Bengaluru",
                "state": "Karnataka",
                "zipCode": "560001",
                "phoneNumber": "+91 98450 00000"
            },
            "totalPrice": "118.00",
            "paymentResult": null
        }))
        .unwrap();

        assert_eq!(body.order_items.len(), 1);
        assert!(body.payment_result.is_none());
        assert_eq!(body.total_price, Some(Decimal::new(118_00, 2)));
    }
}
