use thiserror::Error;

use super::aggregate::{Order, OrderId, OrderStatus};
use super::request::StatusChangeResponse;

/// Staff action on a pending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderAction {
    Complete,
    Cancel,
}

impl OrderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Complete => "complete",
            OrderAction::Cancel => "cancel",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderAction::Complete => "Complete",
            OrderAction::Cancel => "Cancel",
        }
    }

    /// Status the order ends up in once the backend accepts the action
    pub fn target_status(&self) -> OrderStatus {
        match self {
            OrderAction::Complete => OrderStatus::Completed,
            OrderAction::Cancel => OrderStatus::Cancel,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            OrderAction::Complete => "/api/order/complete",
            OrderAction::Cancel => "/api/order/cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("Order has no id")]
    MissingId,

    #[error("Order is {0}, only pending orders can be changed")]
    NotPending(OrderStatus),

    #[error("Failed to {action} order")]
    Rejected {
        action: &'static str,
        detail: Option<String>,
    },
}

/// Check that `action` may be sent for `order` and return the id to send
pub fn ensure_transition_allowed(order: &Order) -> Result<OrderId, OrderError> {
    if !order.can_transition() {
        return Err(OrderError::NotPending(order.status.clone()));
    }
    order.id.clone().ok_or(OrderError::MissingId)
}

/// Apply the backend's answer to the local list.
///
/// Only a `"successful"` reply changes anything, and then only the order
/// with `id`. Any other reply leaves the list untouched and is reported as
/// `Rejected`.
pub fn apply_status_change(
    orders: &[Order],
    id: &OrderId,
    action: OrderAction,
    response: &StatusChangeResponse,
) -> Result<Vec<Order>, OrderError> {
    if !response.is_successful() {
        return Err(OrderError::Rejected {
            action: action.as_str(),
            detail: response.detail.clone(),
        });
    }
    Ok(orders
        .iter()
        .map(|order| {
            if order.id.as_ref() == Some(id) {
                Order {
                    status: action.target_status(),
                    ..order.clone()
                }
            } else {
                order.clone()
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> Vec<Order> {
        ["1", "2", "3"]
            .iter()
            .map(|id| Order {
                id: Some(OrderId::new(*id)),
                status: OrderStatus::Pending,
                ..Default::default()
            })
            .collect()
    }

    fn response(status: &str) -> StatusChangeResponse {
        StatusChangeResponse {
            status: status.to_string(),
            detail: Some("Order updated".to_string()),
        }
    }

    #[test]
    fn test_cancel_success_touches_only_match() {
        let before = orders();
        let after = apply_status_change(
            &before,
            &OrderId::new("2"),
            OrderAction::Cancel,
            &response("successful"),
        )
        .unwrap();

        assert_eq!(after[1].status, OrderStatus::Cancel);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
    }

    #[test]
    fn test_complete_success() {
        let after = apply_status_change(
            &orders(),
            &OrderId::new("1"),
            OrderAction::Complete,
            &response("successful"),
        )
        .unwrap();
        assert_eq!(after[0].status, OrderStatus::Completed);
    }

    #[test]
    fn test_failed_response_changes_nothing() {
        let before = orders();
        let result = apply_status_change(
            &before,
            &OrderId::new("2"),
            OrderAction::Cancel,
            &response("failed"),
        );

        assert_eq!(
            result,
            Err(OrderError::Rejected {
                action: "cancel",
                detail: Some("Order updated".to_string())
            })
        );
        assert!(before.iter().all(|o| o.status == OrderStatus::Pending));
        assert_eq!(result.unwrap_err().to_string(), "Failed to cancel order");
    }

    #[test]
    fn test_only_pending_orders_can_change() {
        let mut order = orders().remove(0);
        assert_eq!(ensure_transition_allowed(&order), Ok(OrderId::new("1")));

        order.status = OrderStatus::Completed;
        assert_eq!(
            ensure_transition_allowed(&order),
            Err(OrderError::NotPending(OrderStatus::Completed))
        );

        let no_id = Order::default();
        assert_eq!(ensure_transition_allowed(&no_id), Err(OrderError::MissingId));
    }

    #[test]
    fn test_action_endpoints() {
        assert_eq!(OrderAction::Cancel.endpoint(), "/api/order/cancel");
        assert_eq!(OrderAction::Complete.endpoint(), "/api/order/complete");
    }
}
