use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::{OrderId, OrderStatus};
use crate::domain::a001_menu::{Cart, CartError, CartItem};

/// Body of `POST /api/place-order`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(rename = "tableNumber")]
    pub table_number: Option<String>,

    pub items: Vec<CartItem>,

    #[serde(rename = "totalPrice")]
    pub total_price: f64,

    #[serde(rename = "itemCount")]
    pub item_count: u32,

    #[serde(rename = "orderDate")]
    pub order_date: String,

    pub status: OrderStatus,
}

impl PlaceOrderRequest {
    /// Assemble the order for a cart. Totals are computed on the client;
    /// an empty cart is refused before anything goes on the wire.
    pub fn from_cart(
        cart: &Cart,
        table_number: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, CartError> {
        if cart.is_empty() {
            return Err(CartError::Empty);
        }
        Ok(Self {
            table_number,
            items: cart.lines().to_vec(),
            total_price: cart.total_price(),
            item_count: cart.item_count(),
            order_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            status: OrderStatus::Pending,
        })
    }
}

/// Body of the cancel/complete calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIdRequest {
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
}

/// Reply of the cancel/complete calls
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusChangeResponse {
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub detail: Option<String>,
}

impl StatusChangeResponse {
    pub const SUCCESS_MARKER: &'static str = "successful";

    pub fn is_successful(&self) -> bool {
        self.status == Self::SUCCESS_MARKER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_menu::MenuItem;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_rice_and_beans_order() {
        let rice = MenuItem::new("Rice", 700.0);
        let beans = MenuItem::new("Beans", 1200.0);
        let cart = Cart::new().with_item(&rice).with_item(&rice).with_item(&beans);
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

        let request = PlaceOrderRequest::from_cart(&cart, Some("5".to_string()), now).unwrap();
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["tableNumber"], "5");
        assert_eq!(body["totalPrice"], 2600.0);
        assert_eq!(body["itemCount"], 3);
        assert_eq!(body["status"], "pending");
        assert_eq!(body["orderDate"], "2024-03-15T12:00:00.000Z");
        assert_eq!(body["items"][0]["name"], "Rice");
        assert_eq!(body["items"][0]["quantity"], 2);
        assert_eq!(body["items"][0]["price"], 700.0);
        assert_eq!(body["items"][1]["name"], "Beans");
        assert_eq!(body["items"][1]["quantity"], 1);
    }

    #[test]
    fn test_empty_cart_is_refused() {
        let result = PlaceOrderRequest::from_cart(&Cart::new(), None, Utc::now());
        assert_eq!(result, Err(CartError::Empty));
    }

    #[test]
    fn test_missing_table_number_is_null() {
        let cart = Cart::new().with_item(&MenuItem::new("Eba", 300.0));
        let request = PlaceOrderRequest::from_cart(&cart, None, Utc::now()).unwrap();
        assert!(serde_json::to_value(&request).unwrap()["tableNumber"].is_null());
    }

    #[test]
    fn test_status_change_response() {
        let ok: StatusChangeResponse =
            serde_json::from_value(json!({ "status": "successful", "detail": "Order cancelled" }))
                .unwrap();
        assert!(ok.is_successful());

        let failed: StatusChangeResponse = serde_json::from_value(json!({ "status": "failed" })).unwrap();
        assert!(!failed.is_successful());

        let odd: StatusChangeResponse = serde_json::from_value(json!({ "message": "?" })).unwrap();
        assert!(!odd.is_successful());
    }

    #[test]
    fn test_order_id_request_shape() {
        let body = serde_json::to_value(OrderIdRequest { order_id: OrderId::new("42") }).unwrap();
        assert_eq!(body, json!({ "orderId": "42" }));
    }
}
