//! HTTP client for the menu backend.
//!
//! One method per endpoint. Every call sends JSON, is aborted after the
//! configured timeout and logs its failure before returning it. There is
//! no retry and no caching.

use std::cell::Cell;
use std::rc::Rc;

use contracts::domain::a002_order::{
    OrderAction, OrderId, OrderIdRequest, PlaceOrderRequest, StatusChangeResponse,
};
use contracts::domain::a003_qr_code::GenerateQrCodeRequest;
use contracts::push::RegisterDeviceRequest;
use contracts::shared::paging::PageRequest;
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use web_sys::AbortController;

use super::api_utils::{api_url, decode_body};
use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
    Patch,
}

impl Verb {
    fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Patch => "PATCH",
        }
    }

    fn builder(&self, url: &str) -> RequestBuilder {
        match self {
            Verb::Get => Request::get(url),
            Verb::Post => Request::post(url),
            Verb::Patch => Request::patch(url),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
    timeout_ms: u32,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_url.clone(),
            timeout_ms: config.request_timeout_ms,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    pub async fn submit_order(&self, req: &PlaceOrderRequest) -> Result<Value, String> {
        self.call(Verb::Post, "/api/place-order", Some(req)).await
    }

    pub async fn list_orders(&self, page: &PageRequest) -> Result<Value, String> {
        self.call(Verb::Post, "/api/orders", Some(page)).await
    }

    pub async fn cancel_order(&self, req: &OrderIdRequest) -> Result<StatusChangeResponse, String> {
        self.transition_order(OrderAction::Cancel, req).await
    }

    pub async fn complete_order(
        &self,
        req: &OrderIdRequest,
    ) -> Result<StatusChangeResponse, String> {
        self.transition_order(OrderAction::Complete, req).await
    }

    pub async fn transition_order(
        &self,
        action: OrderAction,
        req: &OrderIdRequest,
    ) -> Result<StatusChangeResponse, String> {
        self.call(Verb::Patch, action.endpoint(), Some(req)).await
    }

    pub async fn get_order(&self, id: &OrderId) -> Result<Value, String> {
        let path = format!("/api/orders/{}", id.as_str());
        self.call::<(), _>(Verb::Get, &path, None).await
    }

    // ------------------------------------------------------------------
    // Menu, QR codes, push
    // ------------------------------------------------------------------

    pub async fn fetch_menu(&self, page: &PageRequest) -> Result<Value, String> {
        self.call(Verb::Post, "/api/menus", Some(page)).await
    }

    pub async fn list_qr_codes(&self, page: &PageRequest) -> Result<Value, String> {
        self.call(Verb::Post, "/api/get-all-qr-codes", Some(page))
            .await
    }

    pub async fn generate_qr_code(&self, req: &GenerateQrCodeRequest) -> Result<Value, String> {
        self.call(Verb::Post, "/api/qrcode", Some(req)).await
    }

    pub async fn register_push_device(&self, req: &RegisterDeviceRequest) -> Result<Value, String> {
        self.call(Verb::Post, "/api/v1/firebase/register-device", Some(req))
            .await
    }

    async fn call<B, T>(&self, verb: Verb, path: &str, body: Option<&B>) -> Result<T, String>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let result = self.send(verb, path, body).await;
        if let Err(e) = &result {
            log::error!("API {} {} failed: {}", verb.as_str(), path, e);
        }
        result
    }

    async fn send<B, T>(&self, verb: Verb, path: &str, body: Option<&B>) -> Result<T, String>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let controller =
            AbortController::new().map_err(|e| format!("Failed to create abort controller: {:?}", e))?;
        let signal = controller.signal();

        let builder = verb
            .builder(&api_url(&self.base_url, path))
            .header("Content-Type", "application/json")
            .abort_signal(Some(&signal));
        let request = match body {
            Some(body) => builder
                .json(body)
                .map_err(|e| format!("Failed to serialize request: {}", e))?,
            None => builder
                .build()
                .map_err(|e| format!("Failed to build request: {}", e))?,
        };

        let timed_out = Rc::new(Cell::new(false));
        let timer = {
            let timed_out = timed_out.clone();
            Timeout::new(self.timeout_ms, move || {
                timed_out.set(true);
                controller.abort();
            })
        };

        // The timer stays armed until the whole body is in
        let sent = request.send().await;
        let response = sent.map_err(|e| {
            transport_error(timed_out.get(), self.timeout_ms, "Failed to send request", e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            transport_error(timed_out.get(), self.timeout_ms, "Failed to read response", e)
        })?;
        drop(timer);
        if !response.ok() {
            return Err(format!("Server error: {} {}", status, text));
        }
        decode_body(&text)
    }
}

/// An aborted request surfaces as a fetch error; report it as the timeout
fn transport_error(timed_out: bool, timeout_ms: u32, what: &str, e: impl std::fmt::Display) -> String {
    if timed_out {
        format!("Request timed out after {} ms", timeout_ms)
    } else {
        format!("{}: {}", what, e)
    }
}

pub fn use_api_client() -> ApiClient {
    use_context::<ApiClient>().expect("ApiClient not found in context")
}
