//! Standard Web Push subscription through the registered service worker,
//! used for the Firebase provider

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{PushManager, PushSubscriptionOptionsInit, ServiceWorkerRegistration};

use super::js::{has_property, js_error};

pub struct FirebaseSdk {
    vapid_key: Option<String>,
}

impl FirebaseSdk {
    pub fn new(vapid_key: Option<String>) -> Self {
        Self { vapid_key }
    }

    /// Service workers and the Push API are both available
    pub fn is_loaded(&self) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        has_property(&window.navigator(), "serviceWorker") && has_property(&window, "PushManager")
    }

    /// JSON of this browser's push subscription, subscribing first when
    /// there is none yet
    pub fn subscriber_id(&self) -> LocalBoxFuture<'static, Option<String>> {
        let vapid_key = self.vapid_key.clone();
        async move {
            match current_subscription(vapid_key).await {
                Ok(id) => id,
                Err(e) => {
                    log::warn!("Push subscription failed: {}", e);
                    None
                }
            }
        }
        .boxed_local()
    }
}

async fn push_manager() -> Result<PushManager, String> {
    let window = web_sys::window().ok_or("No window object")?;
    let ready = window.navigator().service_worker().ready().map_err(js_error)?;
    let registration: ServiceWorkerRegistration = JsFuture::from(ready)
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| "Unexpected service worker registration".to_string())?;
    registration.push_manager().map_err(js_error)
}

async fn current_subscription(vapid_key: Option<String>) -> Result<Option<String>, String> {
    let manager = push_manager().await?;
    let existing = JsFuture::from(manager.get_subscription().map_err(js_error)?)
        .await
        .map_err(js_error)?;

    let subscription = if existing.is_null() || existing.is_undefined() {
        let Some(key) = vapid_key else {
            return Err("VAPID key is not configured".to_string());
        };
        let options = js_sys::Object::new();
        Reflect::set(&options, &"userVisibleOnly".into(), &JsValue::TRUE).map_err(js_error)?;
        Reflect::set(&options, &"applicationServerKey".into(), &JsValue::from_str(&key))
            .map_err(js_error)?;
        let options: &PushSubscriptionOptionsInit = options.unchecked_ref();
        JsFuture::from(manager.subscribe_with_options(options).map_err(js_error)?)
            .await
            .map_err(js_error)?
    } else {
        existing
    };

    let json = js_sys::JSON::stringify(&subscription).map_err(js_error)?;
    Ok(json.as_string().filter(|s| !s.is_empty() && s != "{}"))
}
