use contracts::push::{PushProvider, PushSdk, SdkEvent};
use futures::future::LocalBoxFuture;
use serde_json::Value;

use super::firebase::FirebaseSdk;
use super::onesignal::OneSignalSdk;
use crate::config::PushConfig;

/// The configured vendor SDK
pub enum ProviderSdk {
    OneSignal(OneSignalSdk),
    Firebase(FirebaseSdk),
}

impl ProviderSdk {
    pub fn for_config(config: &PushConfig) -> Self {
        match config.provider {
            PushProvider::OneSignal => ProviderSdk::OneSignal(OneSignalSdk::new()),
            PushProvider::Firebase => ProviderSdk::Firebase(FirebaseSdk::new(config.vapid_key.clone())),
        }
    }

    /// One-time SDK setup once it is loaded
    pub async fn init(&self, config: &PushConfig) -> Result<(), String> {
        match self {
            ProviderSdk::OneSignal(sdk) => sdk.init(config).await,
            ProviderSdk::Firebase(_) => Ok(()),
        }
    }
}

impl PushSdk for ProviderSdk {
    fn is_loaded(&self) -> bool {
        match self {
            ProviderSdk::OneSignal(sdk) => sdk.is_loaded(),
            ProviderSdk::Firebase(sdk) => sdk.is_loaded(),
        }
    }

    fn subscriber_id(&self) -> LocalBoxFuture<'static, Option<String>> {
        match self {
            ProviderSdk::OneSignal(sdk) => sdk.subscriber_id(),
            ProviderSdk::Firebase(sdk) => sdk.subscriber_id(),
        }
    }

    fn supports_events(&self) -> bool {
        match self {
            ProviderSdk::OneSignal(sdk) => sdk.supports_events(),
            // Foreground Web Push messages only arrive through the worker relay
            ProviderSdk::Firebase(_) => false,
        }
    }

    fn on(&self, event: SdkEvent, handler: Box<dyn Fn(Value)>) -> Result<(), String> {
        match self {
            ProviderSdk::OneSignal(sdk) => sdk.on(event, handler),
            ProviderSdk::Firebase(_) => Err("Web Push has no page-side events".to_string()),
        }
    }
}
