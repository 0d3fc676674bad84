//! Helpers for building request URLs and decoding response bodies

use serde::de::DeserializeOwned;

/// Join the API base URL and an absolute path
///
/// # Example
/// ```rust
/// # use frontend::shared::api_utils::api_url;
/// assert_eq!(api_url("http://localhost:3001/", "/api/orders"), "http://localhost:3001/api/orders");
/// ```
pub fn api_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Origin of the current page, the URL that table QR codes point at
pub fn page_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// Decode a response body. An empty body reads as JSON `null`.
pub fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, String> {
    let text = text.trim();
    let text = if text.is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| format!("Failed to parse response: {}", e))
}
