use contracts::domain::a002_order::{
    apply_status_change, ensure_transition_allowed, normalize_order, normalize_orders,
    sort_newest_first, Order, OrderAction, OrderError, OrderId, OrderIdRequest,
    StatusChangeResponse,
};
use contracts::shared::paging::PageRequest;
use leptos::prelude::*;

use crate::shared::api_client::ApiClient;

#[derive(Clone, Copy)]
pub struct OrderListViewModel {
    pub orders: RwSignal<Vec<Order>>,
    /// Order shown in the detail pane
    pub selected: RwSignal<Option<Order>>,
    pub loading: RwSignal<bool>,
    /// Order with a cancel/complete call in flight
    pub busy: RwSignal<Option<OrderId>>,
    pub error: RwSignal<Option<String>>,
    /// Server `detail` of the last accepted status change
    pub message: RwSignal<Option<String>>,
    api: StoredValue<ApiClient>,
}

impl OrderListViewModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            orders: RwSignal::new(Vec::new()),
            selected: RwSignal::new(None),
            loading: RwSignal::new(false),
            busy: RwSignal::new(None),
            error: RwSignal::new(None),
            message: RwSignal::new(None),
            api: StoredValue::new(api),
        }
    }

    pub fn fetch_orders(&self) {
        let vm = *self;
        let api = vm.api.get_value();
        vm.loading.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            // The page may be gone by the time the response lands
            match api.list_orders(&PageRequest::first_page()).await {
                Ok(body) => {
                    let mut orders = normalize_orders(&body);
                    sort_newest_first(&mut orders);
                    log::debug!("Loaded {} orders", orders.len());
                    vm.orders.try_set(orders);
                    vm.error.try_set(None);
                }
                Err(_) => {
                    vm.error.try_set(Some("Failed to fetch orders".to_string()));
                }
            }
            vm.loading.try_set(false);
        });
    }

    pub fn select_order(&self, order: Order) {
        self.selected.set(Some(order));
    }

    pub fn clear_selection(&self) {
        self.selected.set(None);
    }

    /// `false` as well once the signals are disposed
    fn is_selected(&self, id: &OrderId) -> bool {
        self.selected
            .try_with_untracked(|s| s.as_ref().and_then(|o| o.id.as_ref()) == Some(id))
            .unwrap_or(false)
    }

    /// Reload the order in the detail pane from the server
    pub fn refresh_selected(&self) {
        let Some(id) = self
            .selected
            .with_untracked(|s| s.as_ref().and_then(|o| o.id.clone()))
        else {
            return;
        };
        let vm = *self;
        let api = vm.api.get_value();
        wasm_bindgen_futures::spawn_local(async move {
            match api.get_order(&id).await.map(|body| normalize_order(&body)) {
                Ok(Some(fresh)) => {
                    vm.orders.try_update(|orders| {
                        for order in orders.iter_mut().filter(|o| o.is_same(&fresh)) {
                            *order = fresh.clone();
                        }
                    });
                    if vm.is_selected(&id) {
                        vm.selected.try_set(Some(fresh));
                    }
                }
                Ok(None) => {
                    vm.error.try_set(Some(format!("Order {} not found", id)));
                }
                Err(_) => {
                    vm.error.try_set(Some("Failed to fetch order".to_string()));
                }
            }
        });
    }

    /// Ask the backend to complete or cancel `order`. The local list only
    /// changes once the backend reports success.
    pub fn transition_status(&self, order: &Order, action: OrderAction) {
        let id = match ensure_transition_allowed(order) {
            Ok(id) => id,
            Err(e) => {
                self.error.set(Some(e.to_string()));
                return;
            }
        };
        if self.busy.get_untracked().is_some() {
            return;
        }

        let vm = *self;
        let api = vm.api.get_value();
        vm.busy.set(Some(id.clone()));
        wasm_bindgen_futures::spawn_local(async move {
            let request = OrderIdRequest {
                order_id: id.clone(),
            };
            let reply = api.transition_order(action, &request).await;
            vm.finish_transition(&id, action, reply);
        });
    }

    /// Apply the backend's reply to a cancel/complete call. Does nothing
    /// once the page that asked has been torn down.
    fn finish_transition(
        &self,
        id: &OrderId,
        action: OrderAction,
        reply: Result<StatusChangeResponse, String>,
    ) {
        let outcome = match reply {
            Ok(response) => {
                let Some(applied) = self
                    .orders
                    .try_with_untracked(|orders| apply_status_change(orders, id, action, &response))
                else {
                    log::debug!("Order {}: page closed before the reply", id);
                    return;
                };
                applied.map(|updated| (updated, response.detail))
            }
            Err(_) => Err(OrderError::Rejected {
                action: action.as_str(),
                detail: None,
            }),
        };

        match outcome {
            Ok((updated, detail)) => {
                log::info!("Order {}: {} accepted", id, action.as_str());
                self.orders.try_set(updated);
                self.error.try_set(None);
                self.message.try_set(Some(
                    detail.unwrap_or_else(|| format!("{} successful", action.label())),
                ));
                if self.is_selected(id) {
                    self.selected.try_set(None);
                }
            }
            Err(e) => {
                log::warn!("Order {}: {}", id, e);
                self.message.try_set(None);
                self.error.try_set(Some(e.to_string()));
            }
        }
        self.busy.try_set(None);
    }
}
