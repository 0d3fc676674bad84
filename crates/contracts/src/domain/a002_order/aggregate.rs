use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

use crate::domain::a001_menu::CartItem;
use crate::shared::date_utils::parse_timestamp;
use crate::shared::response::{extract_list, lenient_f64, string_or_number};

// ============================================================================
// ID Type
// ============================================================================

/// Backend order id. Sent as a string or a number depending on the backend
/// build, always handled as text here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        string_or_number(deserializer)?
            .map(OrderId)
            .ok_or_else(|| serde::de::Error::custom("order id must be a string or a number"))
    }
}

// ============================================================================
// Status
// ============================================================================

/// Order lifecycle: `pending` → `completed` or `pending` → `cancel`.
///
/// Read case-insensitively; strings the client does not know are kept in
/// `Unknown` so a new backend status never breaks the order list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancel,
    Unknown(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancel => "cancel",
            OrderStatus::Unknown(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => OrderStatus::Pending,
            "completed" | "complete" => OrderStatus::Completed,
            "cancel" | "cancelled" | "canceled" => OrderStatus::Cancel,
            _ => OrderStatus::Unknown(raw.to_string()),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(OrderStatus::parse(&raw))
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// A placed order as listed by `/api/orders`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,

    #[serde(rename = "tableNumber", default, deserialize_with = "string_or_number")]
    pub table_number: Option<String>,

    #[serde(default)]
    pub items: Vec<CartItem>,

    #[serde(rename = "totalPrice", default, deserialize_with = "lenient_f64")]
    pub total_price: f64,

    #[serde(rename = "itemCount", default)]
    pub item_count: u32,

    #[serde(rename = "orderDate", default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,

    #[serde(rename = "orderedAt", default, skip_serializing_if = "Option::is_none")]
    pub ordered_at: Option<String>,

    #[serde(default)]
    pub status: OrderStatus,
}

impl Order {
    /// Total recomputed from the lines, used by the detail pane
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn items_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Staff may complete or cancel only while the order is pending
    pub fn can_transition(&self) -> bool {
        self.status.is_pending()
    }

    /// `orderedAt`, falling back to the client-side `orderDate`
    pub fn placed_at(&self) -> Option<&str> {
        self.ordered_at.as_deref().or(self.order_date.as_deref())
    }

    pub fn is_same(&self, other: &Order) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Decode the `/api/orders` body (`{ "orders": [...] }` or a bare array).
/// Entries that fail to decode are skipped with a warning.
pub fn normalize_orders(body: &serde_json::Value) -> Vec<Order> {
    extract_list(body, "orders")
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<Order>(raw) {
            Ok(order) => Some(order),
            Err(e) => {
                log::warn!("Skipping malformed order entry: {}", e);
                None
            }
        })
        .collect()
}

/// Decode the `/api/orders/{id}` body (`{ "order": {...} }` or the order
/// itself)
pub fn normalize_order(body: &serde_json::Value) -> Option<Order> {
    let raw = match body.get("order") {
        Some(inner) if inner.is_object() => inner,
        _ => body,
    };
    if !raw.is_object() {
        return None;
    }
    serde_json::from_value(raw.clone())
        .map_err(|e| log::warn!("Malformed order: {}", e))
        .ok()
}

/// Newest first by `orderedAt`. Orders without a readable timestamp go last,
/// keeping their relative order.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        let ta = a.ordered_at.as_deref().and_then(parse_timestamp);
        let tb = b.ordered_at.as_deref().and_then(parse_timestamp);
        match (ta, tb) {
            (Some(ta), Some(tb)) => tb.cmp(&ta),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}
