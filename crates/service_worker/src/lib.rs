//! Push relay service worker.
//!
//! `public/sw.js` registers the event listeners synchronously (browsers
//! ignore listeners added later) and forwards each event here once the
//! module is loaded. Handlers return the promise the loader passes to
//! `waitUntil`.

pub mod clients;
pub mod config;
pub mod handlers;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use web_sys::{NotificationEvent, PushEvent};

#[wasm_bindgen(start)]
pub fn start() {
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub fn on_install() -> Promise {
    handlers::install()
}

#[wasm_bindgen]
pub fn on_activate() -> Promise {
    handlers::activate()
}

#[wasm_bindgen]
pub fn on_push(event: PushEvent) -> Promise {
    handlers::push(event)
}

#[wasm_bindgen]
pub fn on_notification_click(event: NotificationEvent) -> Promise {
    handlers::notification_click(event)
}

#[wasm_bindgen]
pub fn on_notification_close(event: NotificationEvent) {
    handlers::notification_close(event)
}
