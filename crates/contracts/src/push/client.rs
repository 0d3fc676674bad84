//! Page-side push client.
//!
//! Bridges a vendor SDK that loads asynchronously into one awaitable
//! readiness step and one event callback. The client is an ordinary value:
//! each page builds its own and drops it on unmount.

use futures::future::{LocalBoxFuture, Shared};
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::backoff::{poll_until, retry_with_backoff, BackoffPolicy, CancelToken, Sleep};
use super::event::{PushEvent, PushEventKind};
use super::relay::RelayMessage;

/// SDK events the client listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdkEvent {
    NotificationDisplay,
    NotificationClick,
    SubscriptionChange,
}

impl SdkEvent {
    pub const ALL: [SdkEvent; 3] = [
        SdkEvent::NotificationDisplay,
        SdkEvent::NotificationClick,
        SdkEvent::SubscriptionChange,
    ];

    pub fn kind(&self) -> PushEventKind {
        match self {
            SdkEvent::NotificationDisplay => PushEventKind::Notification,
            SdkEvent::NotificationClick => PushEventKind::Click,
            SdkEvent::SubscriptionChange => PushEventKind::Subscription,
        }
    }
}

/// Vendor push SDK as the client needs it
pub trait PushSdk {
    /// The SDK global exists and exposes the methods the client calls
    fn is_loaded(&self) -> bool;

    /// Stable id of this browser's subscription, if the SDK has one yet
    fn subscriber_id(&self) -> LocalBoxFuture<'static, Option<String>>;

    /// Whether `on` can be used right now
    fn supports_events(&self) -> bool;

    fn on(&self, event: SdkEvent, handler: Box<dyn Fn(Value)>) -> Result<(), String>;
}

/// Messages posted by the service worker
pub trait RelayChannel {
    fn subscribe(&self, handler: Box<dyn Fn(RelayMessage)>) -> Result<Subscription, String>;
}

/// Runs its teardown when dropped
pub struct Subscription(Option<Box<dyn FnOnce()>>);

impl Subscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(teardown)))
    }

    pub fn noop() -> Self {
        Self(None)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(teardown) = self.0.take() {
            teardown();
        }
    }
}

/// Listeners installed by `PushClient::listen`. Holds the SDK handle so its
/// handlers keep firing after the client itself is dropped; the relay
/// listener is removed when this is dropped.
pub struct Listeners {
    pub sdk_events: usize,
    pub relay: bool,
    _subscriptions: Vec<Subscription>,
    _sdk: Rc<dyn Any>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyPolicy {
    pub poll_interval_ms: u32,
    pub max_polls: u32,
}

impl Default for ReadyPolicy {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            max_polls: 50,
        }
    }
}

type ReadyFuture = Shared<LocalBoxFuture<'static, bool>>;

pub struct PushClient<S: PushSdk, R: RelayChannel> {
    sdk: Rc<S>,
    relay: R,
    policy: ReadyPolicy,
    sleep: Sleep,
    cancel: CancelToken,
    ready: Cell<bool>,
    in_flight: RefCell<Option<ReadyFuture>>,
}

impl<S: PushSdk + 'static, R: RelayChannel> PushClient<S, R> {
    pub fn new(sdk: S, relay: R, policy: ReadyPolicy, sleep: Sleep) -> Self {
        Self {
            sdk: Rc::new(sdk),
            relay,
            policy,
            sleep,
            cancel: CancelToken::new(),
            ready: Cell::new(false),
            in_flight: RefCell::new(None),
        }
    }

    pub fn sdk(&self) -> &S {
        &self.sdk
    }

    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    /// Stop pending readiness polls; later `ready()` calls return `false`
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Wait until the SDK is usable.
    ///
    /// Concurrent callers share one poll loop. Success is remembered; a
    /// failed round (polls exhausted or cancelled) is forgotten so the
    /// caller can try again later. Never fails loudly.
    pub async fn ready(&self) -> bool {
        if self.ready.get() {
            return true;
        }
        let round = {
            let mut slot = self.in_flight.borrow_mut();
            slot.get_or_insert_with(|| self.start_round()).clone()
        };
        let ok = round.await;
        if ok {
            self.ready.set(true);
        }
        self.in_flight.borrow_mut().take();
        ok
    }

    fn start_round(&self) -> ReadyFuture {
        let sdk = self.sdk.clone();
        let sleep = self.sleep.clone();
        let cancel = self.cancel.clone();
        let policy = self.policy;
        async move {
            let ok = poll_until(policy.max_polls, policy.poll_interval_ms, &sleep, &cancel, || {
                sdk.is_loaded()
            })
            .await;
            if ok {
                log::info!("Push SDK ready");
            } else {
                log::warn!("Push SDK not ready after {} polls", policy.max_polls);
            }
            ok
        }
        .boxed_local()
        .shared()
    }

    /// Subscriber id from the SDK; `None` before `ready()` succeeded
    pub async fn subscriber_id(&self) -> Option<String> {
        if !self.ready.get() {
            log::debug!("Push SDK not ready, no subscriber id");
            return None;
        }
        self.sdk
            .subscriber_id()
            .await
            .filter(|id| !id.is_empty())
    }

    /// Ask for the subscriber id up to `max_attempts` times, waiting
    /// `initial_delay_ms` ×1.5 per attempt in between
    pub async fn subscriber_id_with_retry(
        &self,
        max_attempts: u32,
        initial_delay_ms: u32,
    ) -> Option<String> {
        let policy = BackoffPolicy::new(max_attempts, initial_delay_ms);
        let id = retry_with_backoff(&policy, &self.sleep, |_| self.subscriber_id()).await;
        if id.is_none() {
            log::warn!("No push subscriber id after {} attempts", max_attempts);
        }
        id
    }

    /// Route SDK events and relayed worker messages into `callback`, both
    /// normalized to `PushEvent`. Without SDK event support only the relay
    /// listener is installed.
    pub fn listen(&self, callback: Rc<dyn Fn(PushEvent)>) -> Listeners {
        let mut sdk_events = 0;
        if self.sdk.supports_events() {
            for event in SdkEvent::ALL {
                let cb = callback.clone();
                let handler = Box::new(move |data: Value| cb(PushEvent::now(event.kind(), data)));
                match self.sdk.on(event, handler) {
                    Ok(()) => sdk_events += 1,
                    Err(e) => log::warn!("Could not listen to {:?}: {}", event, e),
                }
            }
        } else {
            log::info!("Push SDK events unavailable, relying on the service worker relay");
        }

        let mut subscriptions = Vec::new();
        let relay_cb = callback;
        let relay = match self
            .relay
            .subscribe(Box::new(move |message| relay_cb(PushEvent::from_relay(message))))
        {
            Ok(subscription) => {
                subscriptions.push(subscription);
                true
            }
            Err(e) => {
                log::warn!("Could not listen to service worker messages: {}", e);
                false
            }
        };

        Listeners {
            sdk_events,
            relay,
            _subscriptions: subscriptions,
            _sdk: self.sdk.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push::backoff::test_support::recording_sleep;
    use crate::push::relay::RelayPayload;
    use futures::executor::block_on;
    use futures::future::join;
    use serde_json::json;

    #[derive(Default)]
    struct FakeSdk {
        loaded_after: Cell<u32>,
        id_after: Cell<u32>,
        events: bool,
        handlers: RefCell<Vec<(SdkEvent, Box<dyn Fn(Value)>)>>,
        id_calls: Rc<Cell<u32>>,
    }

    impl PushSdk for FakeSdk {
        fn is_loaded(&self) -> bool {
            let left = self.loaded_after.get();
            if left == 0 {
                return true;
            }
            self.loaded_after.set(left - 1);
            false
        }

        fn subscriber_id(&self) -> LocalBoxFuture<'static, Option<String>> {
            let calls = self.id_calls.clone();
            let after = self.id_after.get();
            async move {
                calls.set(calls.get() + 1);
                (calls.get() > after).then(|| "player-42".to_string())
            }
            .boxed_local()
        }

        fn supports_events(&self) -> bool {
            self.events
        }

        fn on(&self, event: SdkEvent, handler: Box<dyn Fn(Value)>) -> Result<(), String> {
            self.handlers.borrow_mut().push((event, handler));
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    struct FakeRelay {
        handler: Rc<RefCell<Option<Box<dyn Fn(RelayMessage)>>>>,
        dropped: Rc<Cell<bool>>,
    }

    impl FakeRelay {
        fn post(&self, message: RelayMessage) {
            if let Some(handler) = self.handler.borrow().as_ref() {
                handler(message);
            }
        }
    }

    impl RelayChannel for FakeRelay {
        fn subscribe(&self, handler: Box<dyn Fn(RelayMessage)>) -> Result<Subscription, String> {
            *self.handler.borrow_mut() = Some(handler);
            let dropped = self.dropped.clone();
            Ok(Subscription::new(move || dropped.set(true)))
        }
    }

    type Recorded = Rc<RefCell<Vec<u32>>>;

    fn client(sdk: FakeSdk, relay: FakeRelay) -> (PushClient<FakeSdk, FakeRelay>, Recorded) {
        let (sleep, slept) = recording_sleep();
        (PushClient::new(sdk, relay, ReadyPolicy::default(), sleep), slept)
    }

    #[test]
    fn test_ready_polls_until_loaded_and_is_remembered() {
        let sdk = FakeSdk::default();
        sdk.loaded_after.set(3);
        let (client, slept) = client(sdk, FakeRelay::default());

        assert!(block_on(client.ready()));
        assert_eq!(*slept.borrow(), vec![100, 100, 100]);

        assert!(block_on(client.ready()));
        assert_eq!(slept.borrow().len(), 3);
        assert!(client.is_ready());
    }

    #[test]
    fn test_concurrent_ready_calls_share_one_round() {
        let sdk = FakeSdk::default();
        sdk.loaded_after.set(2);
        let (client, slept) = client(sdk, FakeRelay::default());

        let (a, b) = block_on(join(client.ready(), client.ready()));
        assert!(a && b);
        assert_eq!(slept.borrow().len(), 2);
    }

    #[test]
    fn test_ready_fails_quietly_then_retries() {
        let sdk = FakeSdk::default();
        sdk.loaded_after.set(60);
        let (client, _) = client(sdk, FakeRelay::default());

        assert!(!block_on(client.ready()));
        assert!(!client.is_ready());
        // Ten more polls are left before the fake SDK reports loaded
        assert!(block_on(client.ready()));
    }

    #[test]
    fn test_cancelled_ready_returns_false() {
        let sdk = FakeSdk::default();
        sdk.loaded_after.set(5);
        let (client, _) = client(sdk, FakeRelay::default());
        client.cancel();
        assert!(!block_on(client.ready()));
    }

    #[test]
    fn test_subscriber_id_requires_ready() {
        let (client, _) = client(FakeSdk::default(), FakeRelay::default());
        assert_eq!(block_on(client.subscriber_id()), None);
        assert_eq!(client.sdk().id_calls.get(), 0);
    }

    #[test]
    fn test_subscriber_id_with_retry() {
        let sdk = FakeSdk::default();
        sdk.id_after.set(2);
        let (client, slept) = client(sdk, FakeRelay::default());
        assert!(block_on(client.ready()));

        let id = block_on(client.subscriber_id_with_retry(5, 1000));
        assert_eq!(id.as_deref(), Some("player-42"));
        assert_eq!(*slept.borrow(), vec![1000, 1500]);
    }

    #[test]
    fn test_subscriber_id_with_retry_gives_up() {
        let sdk = FakeSdk::default();
        sdk.id_after.set(10);
        let (client, _) = client(sdk, FakeRelay::default());
        assert!(block_on(client.ready()));
        assert_eq!(block_on(client.subscriber_id_with_retry(3, 10)), None);
        assert_eq!(client.sdk().id_calls.get(), 3);
    }

    #[test]
    fn test_listen_normalizes_both_paths() {
        let relay = FakeRelay::default();
        let sdk = FakeSdk {
            events: true,
            ..Default::default()
        };
        let (client, _) = client(sdk, relay.clone());

        let received: Rc<RefCell<Vec<PushEvent>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = received.clone();
        let listeners = client.listen(Rc::new(move |event| sink.borrow_mut().push(event)));
        assert_eq!(listeners.sdk_events, 3);
        assert!(listeners.relay);

        for (event, handler) in client.sdk().handlers.borrow().iter() {
            if *event == SdkEvent::NotificationDisplay {
                handler(json!({ "heading": "Order", "content": "Table 5" }));
            }
        }
        relay.post(RelayMessage::Notification(RelayPayload {
            title: "Order".to_string(),
            body: "Table 5".to_string(),
            ..Default::default()
        }));

        let events = received.borrow();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind == PushEventKind::Notification));
        assert!(events.iter().all(|e| e.title().as_deref() == Some("Order")));
    }

    #[test]
    fn test_listen_without_sdk_events_uses_relay_only() {
        let relay = FakeRelay::default();
        let (client, _) = client(FakeSdk::default(), relay.clone());

        let count = Rc::new(Cell::new(0));
        let sink = count.clone();
        let listeners = client.listen(Rc::new(move |_| sink.set(sink.get() + 1)));
        assert_eq!(listeners.sdk_events, 0);
        assert!(client.sdk().handlers.borrow().is_empty());

        relay.post(RelayMessage::Click(RelayPayload::default()));
        assert_eq!(count.get(), 1);

        drop(listeners);
        assert!(relay.dropped.get());
    }

    /// Disables its handlers once dropped, like the browser SDK bindings
    struct GuardedSdk {
        alive: Rc<Cell<bool>>,
        handlers: Rc<RefCell<Vec<Box<dyn Fn(Value)>>>>,
    }

    impl PushSdk for GuardedSdk {
        fn is_loaded(&self) -> bool {
            true
        }

        fn subscriber_id(&self) -> LocalBoxFuture<'static, Option<String>> {
            async { None }.boxed_local()
        }

        fn supports_events(&self) -> bool {
            true
        }

        fn on(&self, _event: SdkEvent, handler: Box<dyn Fn(Value)>) -> Result<(), String> {
            let alive = self.alive.clone();
            self.handlers.borrow_mut().push(Box::new(move |data| {
                if alive.get() {
                    handler(data)
                }
            }));
            Ok(())
        }
    }

    impl Drop for GuardedSdk {
        fn drop(&mut self) {
            self.alive.set(false);
        }
    }

    #[test]
    fn test_listeners_outlive_client() {
        let alive = Rc::new(Cell::new(true));
        let handlers: Rc<RefCell<Vec<Box<dyn Fn(Value)>>>> = Rc::new(RefCell::new(Vec::new()));
        let sdk = GuardedSdk {
            alive: alive.clone(),
            handlers: handlers.clone(),
        };
        let (sleep, _) = recording_sleep();
        let client = Rc::new(PushClient::new(sdk, FakeRelay::default(), ReadyPolicy::default(), sleep));

        let count = Rc::new(Cell::new(0));
        let sink = count.clone();
        let listeners = {
            let owned = client;
            owned.listen(Rc::new(move |_| sink.set(sink.get() + 1)))
        };
        assert_eq!(listeners.sdk_events, 3);

        for handler in handlers.borrow().iter() {
            handler(json!({ "heading": "Order", "content": "Table 5" }));
        }
        assert_eq!(count.get(), 3);
        assert!(alive.get());

        drop(listeners);
        assert!(!alive.get());
    }
}
