pub mod aggregate;
pub mod request;
pub mod transition;

pub use aggregate::{
    normalize_order, normalize_orders, sort_newest_first, Order, OrderId, OrderStatus,
};
pub use request::{OrderIdRequest, PlaceOrderRequest, StatusChangeResponse};
pub use transition::{apply_status_change, ensure_transition_allowed, OrderAction, OrderError};
