//! Browser side of push notifications: vendor SDK bindings, the service
//! worker relay listener and device registration

pub mod firebase;
pub mod js;
pub mod onesignal;
pub mod registration;
pub mod relay_channel;
pub mod sdk;
pub mod service;

pub use registration::register_device;
pub use relay_channel::ServiceWorkerRelay;
pub use sdk::ProviderSdk;
pub use service::{browser_sleep, new_push_client, start_push, PushService, READY_RETRY_MS};
