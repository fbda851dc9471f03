//! Order models.
//!
//! An order is an immutable snapshot of the cart at checkout time: item
//! name, price, quantity and image are captured as-is so later catalog
//! edits never rewrite order history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use greenbasket_core::{OrderId, OrderItemId, OrderStatus, ProductId, SubjectId};

/// An order row.
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub subject: SubjectId,
    pub shipping_full_name: String,
    pub shipping_street_address: String,
    pub shipping_city: String,
    pub shipping_state: String,
    pub shipping_zip_code: String,
    pub shipping_phone_number: String,
    pub total_price: Decimal,
    /// Gateway payload for prepaid orders; `None` means cash on delivery.
    pub payment_result: Option<serde_json::Value>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// An order line snapshot row.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    #[serde(skip_serializing)]
    pub order_id: OrderId,
    /// `None` if the product was deleted after the order was placed.
    pub product_id: Option<ProductId>,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image: String,
}

/// The shipping address snapshot captured on an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone_number: String,
}

/// JSON view of an order line.
pub type OrderItemView = OrderItem;

/// JSON view of an order with its items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: OrderId,
    pub order_items: Vec<OrderItemView>,
    pub shipping_address: ShippingAddress,
    pub total_price: Decimal,
    pub payment_result: Option<serde_json::Value>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl OrderView {
    /// Assemble the view from an order row and its item rows.
    #[must_use]
    pub fn from_parts(order: Order, items: Vec<OrderItem>) -> Self {
        Self {
            id: order.id,
            order_items: items,
            shipping_address: ShippingAddress {
                full_name: order.shipping_full_name,
                street_address: order.shipping_street_address,
                city: order.shipping_city,
                state: order.shipping_state,
                zip_code: order.shipping_zip_code,
                phone_number: order.shipping_phone_number,
            },
            total_price: order.total_price,
            payment_result: order.payment_result,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_view_shape_matches_client_contract() {
        let order = Order {
            id: OrderId::new(1),
            subject: SubjectId::parse("user_abc").unwrap(),
            shipping_full_name: "Asha Rao".to_string(),
            shipping_street_address: "14 MG Road".to_string(),
            shipping_city: "Bengaluru".to_string(),
            shipping_state: "Karnataka".to_string(),
            shipping_zip_code: "560001".to_string(),
            shipping_phone_number: "+91 98450 00000".to_string(),
            total_price: Decimal::new(129_60, 2),
            payment_result: None,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        let items = vec![OrderItem {
            id: OrderItemId::new(1),
            order_id: OrderId::new(1),
            product_id: Some(ProductId::new(10)),
            name: "Trail Running Shoes".to_string(),
            price: Decimal::new(110_74, 2),
            quantity: 1,
            image: "https://img.example.com/shoes.jpg".to_string(),
        }];

        let json = serde_json::to_value(OrderView::from_parts(order, items)).unwrap();
        assert!(json.get("orderItems").is_some());
        assert!(json.get("shippingAddress").is_some());
        assert!(json.get("totalPrice").is_some());
        // COD orders serialize the payment result as null
        assert!(json.get("paymentResult").unwrap().is_null());
        assert_eq!(json.get("status").unwrap(), "pending");
        // The owner reference never leaves the backend
        assert!(json.get("subject").is_none());
    }
}
