use contracts::push::{RelayChannel, RelayMessage, Subscription};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::MessageEvent;

use super::js::{js_error, to_json};

/// Messages the relay service worker posts to this tab
#[derive(Debug, Default, Clone, Copy)]
pub struct ServiceWorkerRelay;

impl RelayChannel for ServiceWorkerRelay {
    fn subscribe(&self, handler: Box<dyn Fn(RelayMessage)>) -> Result<Subscription, String> {
        let window = web_sys::window().ok_or("No window object")?;
        let container = window.navigator().service_worker();

        let closure = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            match RelayMessage::from_value(to_json(event.data())) {
                Some(message) => handler(message),
                None => log::debug!("Ignoring service worker message of unknown shape"),
            }
        });
        container
            .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            .map_err(js_error)?;

        Ok(Subscription::new(move || {
            if let Err(e) = container
                .remove_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                log::warn!("Failed to remove relay listener: {}", js_error(e));
            }
        }))
    }
}
