//! Push notification model shared by the page and the service worker

pub mod backoff;
pub mod client;
pub mod config;
pub mod device;
pub mod event;
pub mod inbox;
pub mod payload;
pub mod relay;

pub use backoff::{BackoffPolicy, CancelToken, Sleep};
pub use client::{Listeners, PushClient, PushSdk, ReadyPolicy, RelayChannel, SdkEvent, Subscription};
pub use config::{PushProvider, RelayConfig};
pub use device::RegisterDeviceRequest;
pub use event::{PushEvent, PushEventKind};
pub use inbox::{NotificationInbox, UiNotification};
pub use payload::{resolve_display, DisplayNotification, PushPayload};
pub use relay::{broadcast_targets, click_target, ClickTarget, ClientInfo, RelayMessage, RelayPayload};
