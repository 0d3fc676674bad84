use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::config::RelayConfig;

/// `notification` block of a provider push
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NotificationFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Envelope delivered by FCM and OneSignal web push:
/// `{ notification: { title, body, icon }, data: { ... } }`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub notification: Option<NotificationFields>,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

impl PushPayload {
    /// Read a raw push body. Anything unreadable becomes an empty payload so
    /// that a notification with the default texts is still shown.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<PushPayload>(raw) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("Unreadable push payload, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    fn notification_field(&self, pick: fn(&NotificationFields) -> &Option<String>) -> Option<String> {
        self.notification
            .as_ref()
            .and_then(|n| pick(n).clone())
            .filter(|s| !s.is_empty())
    }

    fn data_field(&self, key: &str) -> Option<String> {
        self.data
            .as_ref()
            .and_then(|d| d.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// What the worker hands to `showNotification`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub tag: String,
    pub data: Value,
    pub vibrate: Vec<u32>,
}

/// Resolve the texts to display: `notification.*` wins over `data.*`, which
/// wins over the configured defaults.
pub fn resolve_display(payload: &PushPayload, config: &RelayConfig) -> DisplayNotification {
    let title = payload
        .notification_field(|n| &n.title)
        .or_else(|| payload.data_field("title"))
        .unwrap_or_else(|| config.default_title.clone());
    let body = payload
        .notification_field(|n| &n.body)
        .or_else(|| payload.data_field("body"))
        .unwrap_or_else(|| config.default_body.clone());
    let icon = payload
        .notification_field(|n| &n.icon)
        .or_else(|| payload.data_field("icon"))
        .unwrap_or_else(|| config.default_icon.clone());

    DisplayNotification {
        title,
        body,
        icon,
        badge: config.badge.clone(),
        tag: config.tag(),
        data: payload
            .data
            .clone()
            .map(Value::Object)
            .unwrap_or_else(|| Value::Object(Map::new())),
        vibrate: config.vibrate.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notification_fields_win() {
        let payload = PushPayload::from_value(json!({
            "notification": { "title": "Order", "body": "Table 5" },
            "data": { "title": "ignored", "body": "ignored", "orderId": "9" }
        }));
        let shown = resolve_display(&payload, &RelayConfig::default());
        assert_eq!(shown.title, "Order");
        assert_eq!(shown.body, "Table 5");
        assert_eq!(shown.icon, "/logo192.png");
        assert_eq!(shown.data["orderId"], "9");
    }

    #[test]
    fn test_data_fields_fallback() {
        let payload = PushPayload::from_value(json!({
            "data": { "title": "New order", "body": "Table 2", "icon": "/icon.png" }
        }));
        let shown = resolve_display(&payload, &RelayConfig::default());
        assert_eq!(shown.title, "New order");
        assert_eq!(shown.body, "Table 2");
        assert_eq!(shown.icon, "/icon.png");
    }

    #[test]
    fn test_defaults_for_malformed_payload() {
        let shown = resolve_display(&PushPayload::parse("{not json"), &RelayConfig::default());
        assert_eq!(shown.title, "New Message");
        assert_eq!(shown.body, "You have a new message");
        assert_eq!(shown.data, json!({}));

        let empty_title = PushPayload::from_value(json!({ "notification": { "title": "" } }));
        assert_eq!(resolve_display(&empty_title, &RelayConfig::default()).title, "New Message");
    }
}
