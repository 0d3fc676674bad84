use contracts::push::RelayConfig;
use wasm_bindgen::JsCast;
use web_sys::ServiceWorkerGlobalScope;

pub fn scope() -> ServiceWorkerGlobalScope {
    js_sys::global().unchecked_into()
}

/// Relay settings from the worker script's query string
/// (`/sw.js?provider=firebase`); anything missing keeps its default
pub fn relay_config() -> RelayConfig {
    parse_relay_config(&scope().location().search())
}

pub fn parse_relay_config(search: &str) -> RelayConfig {
    let query = search.trim_start_matches('?');
    if query.is_empty() {
        return RelayConfig::default();
    }
    serde_qs::from_str(query).unwrap_or_else(|e| {
        log::warn!("Ignoring worker query '{}': {}", search, e);
        RelayConfig::default()
    })
}
