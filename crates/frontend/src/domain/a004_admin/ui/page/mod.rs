//! Staff dashboard: QR codes, orders and live notifications

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use contracts::push::{Listeners, NotificationInbox, PushEvent, PushEventKind};
use leptos::prelude::*;

use crate::config::use_app_config;
use crate::domain::a002_order::ui::list::{OrderList, OrderListViewModel};
use crate::domain::a003_qr_code::ui::list::QrCodeList;
use crate::domain::a004_admin::ui::inbox::InboxPanel;
use crate::shared::api_client::use_api_client;
use crate::system::push::{new_push_client, start_push};

#[component]
pub fn AdminPage() -> impl IntoView {
    let config = use_app_config();
    let api = use_api_client();

    let orders = OrderListViewModel::new(api.clone());
    let inbox = RwSignal::new(NotificationInbox::new());
    // Bumped on every new notification; the order list refetches on change
    let order_refresh = RwSignal::new(0u32);

    let alive = Arc::new(AtomicBool::new(true));
    on_cleanup({
        let alive = alive.clone();
        move || alive.store(false, Ordering::Relaxed)
    });
    let listeners = StoredValue::new_local(None::<Listeners>);

    let on_event: Rc<dyn Fn(PushEvent)> = Rc::new(move |event: PushEvent| {
        let added = inbox.try_update(|i| i.receive(&event)).unwrap_or(false);
        if added && event.kind == PushEventKind::Notification {
            log::info!(
                "Notification received: {}",
                event.title().unwrap_or_default()
            );
            order_refresh.try_update(|n| *n = n.wrapping_add(1));
        }
    });

    let client = Rc::new(new_push_client(&config.push));
    wasm_bindgen_futures::spawn_local(async move {
        if let Some(installed) = start_push(client, api, config.push, alive, on_event).await {
            log::debug!(
                "Listening for pushes ({} SDK events, relay: {})",
                installed.sdk_events,
                installed.relay
            );
            listeners.try_update_value(|slot| *slot = Some(installed));
        }
    });

    view! {
        <div class="page admin-page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">"Admin"</h1>
                </div>
            </div>
            <div class="admin-page__grid">
                <div class="admin-page__main">
                    <OrderList vm=orders refresh=order_refresh />
                    <QrCodeList />
                </div>
                <InboxPanel inbox=inbox />
            </div>
        </div>
    }
}
