//! Push startup for the staff page

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use contracts::push::{Listeners, PushClient, PushEvent, ReadyPolicy, Sleep};
use futures::FutureExt;
use gloo_timers::future::TimeoutFuture;

use super::registration::register_device;
use super::relay_channel::ServiceWorkerRelay;
use super::sdk::ProviderSdk;
use crate::config::PushConfig;
use crate::shared::api_client::ApiClient;

pub type PushService = PushClient<ProviderSdk, ServiceWorkerRelay>;

/// Pause between readiness rounds while the SDK script is still missing
pub const READY_RETRY_MS: u32 = 3000;

pub fn browser_sleep() -> Sleep {
    Rc::new(|ms| TimeoutFuture::new(ms).boxed_local())
}

pub fn new_push_client(config: &PushConfig) -> PushService {
    PushClient::new(
        ProviderSdk::for_config(config),
        ServiceWorkerRelay,
        ReadyPolicy::default(),
        browser_sleep(),
    )
}

/// Wait for the SDK (one readiness round every 3 s), register the device
/// and start listening. Gives up once `alive` turns false; returns `None`
/// in that case.
pub async fn start_push(
    client: Rc<PushService>,
    api: ApiClient,
    config: PushConfig,
    alive: Arc<AtomicBool>,
    on_event: Rc<dyn Fn(PushEvent)>,
) -> Option<Listeners> {
    let is_alive = || alive.load(Ordering::Relaxed);

    while !client.ready().await {
        if !is_alive() {
            return None;
        }
        log::debug!("Push SDK not ready, next try in {} ms", READY_RETRY_MS);
        TimeoutFuture::new(READY_RETRY_MS).await;
        if !is_alive() {
            client.cancel();
            return None;
        }
    }

    match register_device(&client, &api, &config).await {
        Ok(_) => log::info!("Push notifications enabled for this browser"),
        Err(e) => log::warn!("Push registration failed: {}", e),
    }

    if !is_alive() {
        return None;
    }
    Some(client.listen(on_event))
}
