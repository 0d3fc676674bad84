use std::collections::HashSet;

use chrono::Utc;
use contracts::domain::a001_menu::{normalize_menus, Cart, Menu, MenuItem};
use contracts::domain::a002_order::PlaceOrderRequest;
use contracts::shared::paging::PageRequest;
use leptos::prelude::*;

use crate::shared::api_client::ApiClient;
use crate::shared::dialog::alert;
use crate::shared::query::current_table_number;

#[derive(Clone, Copy)]
pub struct MenuViewModel {
    pub menus: RwSignal<Vec<Menu>>,
    pub cart: RwSignal<Cart>,
    /// Names of the item cards shown as selected
    pub selected: RwSignal<HashSet<String>>,
    pub loading: RwSignal<bool>,
    pub submitting: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    api: StoredValue<ApiClient>,
}

impl MenuViewModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            menus: RwSignal::new(Vec::new()),
            cart: RwSignal::new(Cart::new()),
            selected: RwSignal::new(HashSet::new()),
            loading: RwSignal::new(false),
            submitting: RwSignal::new(false),
            error: RwSignal::new(None),
            api: StoredValue::new(api),
        }
    }

    pub fn fetch_menu(&self) {
        let vm = *self;
        let api = vm.api.get_value();
        vm.loading.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            match api.fetch_menu(&PageRequest::first_page()).await {
                Ok(body) => {
                    let menus = normalize_menus(&body);
                    log::debug!("Loaded {} menus", menus.len());
                    vm.menus.try_set(menus);
                }
                Err(_) => {
                    vm.error.try_set(Some("Failed to fetch menus".to_string()));
                }
            }
            vm.loading.try_set(false);
        });
    }

    pub fn add_to_cart(&self, item: &MenuItem) {
        let next = self.cart.with_untracked(|cart| cart.with_item(item));
        self.cart.set(next);
        self.selected.update(|s| {
            if !s.remove(&item.name) {
                s.insert(item.name.clone());
            }
        });
        log::info!("Added '{}' to cart", item.name);
    }

    pub fn remove_from_cart(&self, index: usize) {
        let next = self.cart.with_untracked(|cart| cart.without_line(index));
        self.cart.set(next);
    }

    pub fn submit_order(&self) {
        if self.submitting.get_untracked() {
            return;
        }
        let request = match PlaceOrderRequest::from_cart(
            &self.cart.get_untracked(),
            current_table_number(),
            Utc::now(),
        ) {
            Ok(request) => request,
            Err(e) => {
                alert(&e.to_string());
                return;
            }
        };

        let vm = *self;
        let api = vm.api.get_value();
        vm.submitting.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            match api.submit_order(&request).await {
                Ok(_) => {
                    log::info!(
                        "Order placed for table {}",
                        request.table_number.as_deref().unwrap_or("-")
                    );
                    vm.cart.try_set(Cart::new());
                    vm.selected.try_set(HashSet::new());
                    vm.error.try_set(None);
                    alert("Order submitted successfully!");
                }
                Err(e) => {
                    let message = format!("Failed to submit order: {}", e);
                    vm.error.try_set(Some(message.clone()));
                    alert(&message);
                }
            }
            vm.submitting.try_set(false);
        });
    }

    pub fn dismiss_error(&self) {
        self.error.set(None);
    }
}
