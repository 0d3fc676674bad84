use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::relay::RelayMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushEventKind {
    Notification,
    Click,
    Subscription,
}

/// The one shape the page callback receives, whichever path delivered the
/// event (vendor SDK or service worker relay)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "type")]
    pub kind: PushEventKind,
    pub data: Value,
    pub timestamp: String,
}

impl PushEvent {
    pub fn at(kind: PushEventKind, data: Value, at: DateTime<Utc>) -> Self {
        Self {
            kind,
            data,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn now(kind: PushEventKind, data: Value) -> Self {
        Self::at(kind, data, Utc::now())
    }

    /// Relay messages keep their worker-side `sentAt` as the event time so
    /// redelivered copies compare equal
    pub fn from_relay(message: RelayMessage) -> Self {
        let (kind, payload) = match message {
            RelayMessage::Notification(p) => (PushEventKind::Notification, p),
            RelayMessage::Click(p) => (PushEventKind::Click, p),
        };
        let timestamp = payload
            .sent_at
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        Self {
            kind,
            data: serde_json::to_value(&payload).unwrap_or(Value::Null),
            timestamp,
        }
    }

    /// Title as found in either SDK event objects or relay payloads
    pub fn title(&self) -> Option<String> {
        first_text(&self.data, &["title", "heading"])
            .or_else(|| self.data.get("notification").and_then(|n| first_text(n, &["title"])))
    }

    pub fn body(&self) -> Option<String> {
        first_text(&self.data, &["body", "content"])
            .or_else(|| self.data.get("notification").and_then(|n| first_text(n, &["body"])))
    }

    /// Explicit delivery id, when the sender provided one
    pub fn delivery_id(&self) -> Option<String> {
        let nested = self.data.get("data");
        first_text(&self.data, &["notificationId", "id"])
            .or_else(|| nested.and_then(|d| first_text(d, &["notificationId"])))
            .or_else(|| self.data.get("notification").and_then(|n| first_text(n, &["id"])))
    }
}

fn first_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push::relay::RelayPayload;
    use serde_json::json;

    #[test]
    fn test_from_relay_keeps_sent_at() {
        let event = PushEvent::from_relay(RelayMessage::Click(RelayPayload {
            title: "Order".to_string(),
            body: "Table 5".to_string(),
            sent_at: Some("2024-03-15T12:00:00.000Z".to_string()),
            ..Default::default()
        }));
        assert_eq!(event.kind, PushEventKind::Click);
        assert_eq!(event.timestamp, "2024-03-15T12:00:00.000Z");
        assert_eq!(event.title().as_deref(), Some("Order"));
        assert_eq!(event.body().as_deref(), Some("Table 5"));
    }

    #[test]
    fn test_sdk_event_fields() {
        let event = PushEvent::now(
            PushEventKind::Notification,
            json!({ "id": "os-1", "heading": "New order", "content": "Table 3" }),
        );
        assert_eq!(event.title().as_deref(), Some("New order"));
        assert_eq!(event.body().as_deref(), Some("Table 3"));
        assert_eq!(event.delivery_id().as_deref(), Some("os-1"));

        let nested = PushEvent::now(
            PushEventKind::Notification,
            json!({ "notification": { "id": "os-2", "title": "T", "body": "B" } }),
        );
        assert_eq!(nested.title().as_deref(), Some("T"));
        assert_eq!(nested.delivery_id().as_deref(), Some("os-2"));
    }

    #[test]
    fn test_wire_shape() {
        let event = PushEvent::now(PushEventKind::Subscription, json!(true));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "subscription");
    }
}
