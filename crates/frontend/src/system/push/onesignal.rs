//! Bindings over the OneSignal page SDK (`window.OneSignal`)

use std::cell::Cell;
use std::rc::Rc;

use contracts::push::SdkEvent;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::js::{global_object, js_error, method, to_json};
use crate::config::PushConfig;

const GLOBAL: &str = "OneSignal";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InitOptions<'a> {
    app_id: &'a str,
    service_worker_path: &'a str,
    service_worker_param: ServiceWorkerParam<'a>,
    allow_localhost_as_secure_origin: bool,
    auto_register: bool,
    auto_resubscribe: bool,
}

#[derive(Serialize)]
struct ServiceWorkerParam<'a> {
    scope: &'a str,
}

pub struct OneSignalSdk {
    initialized: Cell<bool>,
    /// Handlers handed to the SDK stay registered for the page lifetime
    /// (the SDK has no `off`); they go quiet once this is dropped.
    alive: Rc<Cell<bool>>,
}

impl OneSignalSdk {
    pub fn new() -> Self {
        Self {
            initialized: Cell::new(false),
            alive: Rc::new(Cell::new(true)),
        }
    }

    fn event_name(event: SdkEvent) -> &'static str {
        match event {
            SdkEvent::NotificationDisplay => "notificationDisplay",
            SdkEvent::NotificationClick => "notificationClick",
            SdkEvent::SubscriptionChange => "subscriptionChange",
        }
    }

    pub fn is_loaded(&self) -> bool {
        global_object(GLOBAL)
            .and_then(|sdk| method(&sdk, "getUserId"))
            .is_some()
    }

    pub async fn init(&self, config: &PushConfig) -> Result<(), String> {
        if self.initialized.get() {
            return Ok(());
        }
        let app_id = config
            .onesignal_app_id
            .as_deref()
            .ok_or("OneSignal app id is not configured")?;
        let sdk = global_object(GLOBAL).ok_or("OneSignal SDK is not loaded")?;
        let init = method(&sdk, "init").ok_or("OneSignal.init is missing")?;

        let worker_path = config.service_worker_url();
        let options = InitOptions {
            app_id,
            service_worker_path: worker_path.trim_start_matches('/'),
            service_worker_param: ServiceWorkerParam { scope: "/" },
            allow_localhost_as_secure_origin: true,
            auto_register: true,
            auto_resubscribe: true,
        };
        let options = options
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| format!("Failed to build OneSignal options: {}", e))?;

        let result = init.call1(&sdk, &options).map_err(js_error)?;
        if let Ok(promise) = result.dyn_into::<js_sys::Promise>() {
            JsFuture::from(promise).await.map_err(js_error)?;
        }
        self.initialized.set(true);
        log::info!("OneSignal initialized");
        Ok(())
    }

    pub fn subscriber_id(&self) -> LocalBoxFuture<'static, Option<String>> {
        async move {
            let sdk = global_object(GLOBAL)?;
            let get_user_id = method(&sdk, "getUserId")?;
            let result = match get_user_id.call0(&sdk) {
                Ok(result) => result,
                Err(e) => {
                    log::warn!("OneSignal.getUserId failed: {}", js_error(e));
                    return None;
                }
            };
            let id = match result.dyn_into::<js_sys::Promise>() {
                Ok(promise) => JsFuture::from(promise)
                    .await
                    .map_err(|e| log::warn!("OneSignal.getUserId rejected: {}", js_error(e)))
                    .ok()?,
                Err(value) => value,
            };
            id.as_string()
        }
        .boxed_local()
    }

    pub fn supports_events(&self) -> bool {
        global_object(GLOBAL)
            .and_then(|sdk| method(&sdk, "on"))
            .is_some()
    }

    pub fn on(&self, event: SdkEvent, handler: Box<dyn Fn(Value)>) -> Result<(), String> {
        let sdk = global_object(GLOBAL).ok_or("OneSignal SDK is not loaded")?;
        let on = method(&sdk, "on").ok_or("OneSignal.on is missing")?;

        let alive = self.alive.clone();
        let name = Self::event_name(event);
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |raw: JsValue| {
            if !alive.get() {
                return;
            }
            log::debug!("OneSignal {}", name);
            handler(to_json(raw));
        });
        on.call2(&sdk, &JsValue::from_str(name), closure.as_ref())
            .map_err(js_error)?;
        closure.forget();
        Ok(())
    }
}

impl Default for OneSignalSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for OneSignalSdk {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}
