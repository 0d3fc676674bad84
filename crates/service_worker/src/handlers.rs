use chrono::{SecondsFormat, Utc};
use contracts::push::{
    click_target, resolve_display, ClickTarget, PushPayload, RelayConfig, RelayMessage,
    RelayPayload,
};
use js_sys::Promise;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{Notification, NotificationEvent, NotificationOptions, PushEvent, WindowClient};

use crate::clients::{broadcast, window_clients};
use crate::config::{relay_config, scope};

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn resolved(result: Result<Promise, JsValue>) -> Promise {
    result.unwrap_or_else(|e| Promise::reject(&e))
}

/// Activate a new worker version without waiting for old tabs to close
pub fn install() -> Promise {
    log::info!("Relay worker installing");
    resolved(scope().skip_waiting())
}

/// Take control of already open tabs
pub fn activate() -> Promise {
    log::info!("Relay worker activated");
    scope().clients().claim()
}

pub fn push(event: PushEvent) -> Promise {
    let config = relay_config();
    let raw = event.data().map(|d| d.text()).unwrap_or_default();
    future_to_promise(async move {
        show_and_relay(&raw, &config).await?;
        Ok(JsValue::UNDEFINED)
    })
}

async fn show_and_relay(raw: &str, config: &RelayConfig) -> Result<(), JsValue> {
    let payload = PushPayload::parse(raw);
    let shown = resolve_display(&payload, config);
    log::debug!("Push received: {}", shown.title);

    let options = shown
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)?;
    let options: &NotificationOptions = options.unchecked_ref();
    JsFuture::from(
        scope()
            .registration()
            .show_notification_with_options(&shown.title, options)?,
    )
    .await?;

    let message = RelayMessage::Notification(RelayPayload::from_display(&shown, now()));
    let clients = window_clients().await?;
    let sent = broadcast(&clients, &message)?;
    log::debug!("Notification relayed to {} tab(s)", sent);
    Ok(())
}

pub fn notification_click(event: NotificationEvent) -> Promise {
    let config = relay_config();
    let notification = event.notification();
    notification.close();
    let message = RelayMessage::Click(click_payload(&notification));

    future_to_promise(async move {
        let clients = window_clients().await?;
        broadcast(&clients, &message)?;

        let infos: Vec<_> = clients.iter().map(|(info, _)| info.clone()).collect();
        match click_target(&infos, &config.app_root) {
            ClickTarget::Focus(index) => {
                if let Some(window) = clients
                    .get(index)
                    .and_then(|(_, client)| client.dyn_ref::<WindowClient>())
                {
                    JsFuture::from(window.focus()?).await?;
                }
            }
            ClickTarget::Open(url) => {
                JsFuture::from(scope().clients().open_window(&url)).await?;
            }
        }
        Ok(JsValue::UNDEFINED)
    })
}

fn click_payload(notification: &Notification) -> RelayPayload {
    let data = serde_wasm_bindgen::from_value(notification.data()).unwrap_or_default();
    let tag = notification.tag().unwrap_or_default();
    let icon = notification.icon().unwrap_or_default();
    RelayPayload {
        title: notification.title(),
        body: notification.body().unwrap_or_default(),
        data,
        tag: (!tag.is_empty()).then_some(tag),
        icon: (!icon.is_empty()).then_some(icon),
        sent_at: Some(now()),
    }
}

pub fn notification_close(event: NotificationEvent) {
    log::debug!("Notification closed: {}", event.notification().title());
}
