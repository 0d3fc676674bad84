//! Build-time configuration.
//!
//! Values come from environment variables read by the compiler, so a build
//! for another backend is just `DIGITAL_MENU_API_URL=... trunk build`.

use contracts::push::PushProvider;
use leptos::prelude::*;

pub const DEFAULT_API_URL: &str = "http://localhost:3001";
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;
pub const DEFAULT_SERVICE_WORKER_PATH: &str = "/sw.js";

#[derive(Debug, Clone, PartialEq)]
pub struct PushConfig {
    pub provider: PushProvider,
    pub onesignal_app_id: Option<String>,
    pub vapid_key: Option<String>,
    pub service_worker_path: String,
}

impl PushConfig {
    /// Worker script URL; the worker reads its provider from the query
    pub fn service_worker_url(&self) -> String {
        format!("{}?provider={}", self.service_worker_path, self.provider)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub request_timeout_ms: u32,
    pub push: PushConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("DIGITAL_MENU_API_URL"),
            option_env!("DIGITAL_MENU_PUSH_PROVIDER"),
            option_env!("DIGITAL_MENU_ONESIGNAL_APP_ID"),
            option_env!("DIGITAL_MENU_VAPID_KEY"),
        )
    }

    pub fn from_values(
        api_url: Option<&str>,
        provider: Option<&str>,
        onesignal_app_id: Option<&str>,
        vapid_key: Option<&str>,
    ) -> Self {
        let provider = match provider.map(str::parse::<PushProvider>) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                log::warn!("{}, falling back to {}", e, PushProvider::default());
                PushProvider::default()
            }
            None => PushProvider::default(),
        };
        let non_empty = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            api_url: non_empty(api_url)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            push: PushConfig {
                provider,
                onesignal_app_id: non_empty(onesignal_app_id),
                vapid_key: non_empty(vapid_key),
                service_worker_path: DEFAULT_SERVICE_WORKER_PATH.to_string(),
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None, None, None)
    }
}

pub fn use_app_config() -> AppConfig {
    use_context::<AppConfig>().expect("AppConfig not found in context")
}
