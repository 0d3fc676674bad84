//! Browser registration for push: permission, worker, device token

use contracts::push::RegisterDeviceRequest;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Notification, ServiceWorkerRegistration};

use super::js::js_error;
use super::service::PushService;
use crate::config::PushConfig;
use crate::shared::api_client::ApiClient;

const SUBSCRIBER_ID_ATTEMPTS: u32 = 5;
const SUBSCRIBER_ID_DELAY_MS: u32 = 1000;

pub async fn request_permission() -> Result<(), String> {
    let promise = Notification::request_permission()
        .map_err(|e| format!("Notifications are not supported: {}", js_error(e)))?;
    let permission = JsFuture::from(promise).await.map_err(js_error)?;
    match permission.as_string().as_deref() {
        Some("granted") => Ok(()),
        other => Err(format!(
            "Notification permission not granted ({})",
            other.unwrap_or("unknown")
        )),
    }
}

pub async fn register_service_worker(url: &str) -> Result<ServiceWorkerRegistration, String> {
    let window = web_sys::window().ok_or("No window object")?;
    let promise = window.navigator().service_worker().register(url);
    let registration = JsFuture::from(promise)
        .await
        .map_err(|e| format!("Service worker registration failed: {}", js_error(e)))?;
    log::info!("Service worker registered: {}", url);
    registration
        .dyn_into()
        .map_err(|_| "Unexpected service worker registration".to_string())
}

/// Ask for permission, register the relay worker, then send this browser's
/// subscriber id to the backend. Returns the id that was registered.
pub async fn register_device(
    client: &PushService,
    api: &ApiClient,
    config: &PushConfig,
) -> Result<String, String> {
    request_permission().await?;
    register_service_worker(&config.service_worker_url()).await?;
    client.sdk().init(config).await?;

    let token = client
        .subscriber_id_with_retry(SUBSCRIBER_ID_ATTEMPTS, SUBSCRIBER_ID_DELAY_MS)
        .await
        .ok_or("No push subscriber id available")?;
    api.register_push_device(&RegisterDeviceRequest::web(token.clone(), config.provider))
        .await?;
    log::info!("Push device registered with {}", config.provider);
    Ok(token)
}
