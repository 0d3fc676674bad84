//! Messages the service worker posts to every open tab

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use super::payload::DisplayNotification;

/// Body of a relayed notification
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RelayPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    /// Set by the worker when the message is posted
    #[serde(rename = "sentAt", default)]
    pub sent_at: Option<String>,
}

impl RelayPayload {
    pub fn from_display(shown: &DisplayNotification, sent_at: impl Into<String>) -> Self {
        Self {
            title: shown.title.clone(),
            body: shown.body.clone(),
            data: shown.data.clone(),
            tag: Some(shown.tag.clone()),
            icon: Some(shown.icon.clone()),
            sent_at: Some(sent_at.into()),
        }
    }
}

/// `{ type, payload }` envelope posted through `Client.postMessage`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum RelayMessage {
    #[serde(rename = "ONESIGNAL_NOTIFICATION")]
    Notification(RelayPayload),
    #[serde(rename = "ONESIGNAL_NOTIFICATION_CLICK")]
    Click(RelayPayload),
}

impl RelayMessage {
    pub fn payload(&self) -> &RelayPayload {
        match self {
            RelayMessage::Notification(p) | RelayMessage::Click(p) => p,
        }
    }

    /// Read a `message` event body. Messages of other types (or from other
    /// scripts) are not ours and yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }
}

/// A window client as the worker sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub id: String,
    pub url: String,
    pub focused: bool,
}

/// Clients to post a broadcast to: each distinct client once, in the order
/// the browser listed them
pub fn broadcast_targets(clients: &[ClientInfo]) -> Vec<&ClientInfo> {
    let mut seen = HashSet::new();
    clients
        .iter()
        .filter(|client| seen.insert(client.id.as_str()))
        .collect()
}

/// What a notification click should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// Focus the client at this index of the list given to `click_target`
    Focus(usize),
    /// No tab shows the app root; open one at this URL
    Open(String),
}

/// Prefer a tab already on the app root (a focused one first), otherwise
/// open a new one there.
pub fn click_target(clients: &[ClientInfo], app_root: &str) -> ClickTarget {
    let at_root: Vec<(usize, &ClientInfo)> = clients
        .iter()
        .enumerate()
        .filter(|(_, c)| url_path(&c.url) == app_root)
        .collect();

    at_root
        .iter()
        .find(|(_, c)| c.focused)
        .or_else(|| at_root.first())
        .map(|(i, _)| ClickTarget::Focus(*i))
        .unwrap_or_else(|| ClickTarget::Open(app_root.to_string()))
}

/// Path part of an absolute or relative URL, without query or fragment
fn url_path(url: &str) -> &str {
    let without_scheme = match url.find("://") {
        Some(i) => {
            let rest = &url[i + 3..];
            match rest.find('/') {
                Some(j) => &rest[j..],
                None => "/",
            }
        }
        None => url,
    };
    let end = without_scheme
        .find(|c| c == '?' || c == '#')
        .unwrap_or(without_scheme.len());
    &without_scheme[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push::config::RelayConfig;
    use crate::push::payload::{resolve_display, PushPayload};
    use serde_json::json;

    fn client(id: &str, url: &str, focused: bool) -> ClientInfo {
        ClientInfo {
            id: id.to_string(),
            url: url.to_string(),
            focused,
        }
    }

    #[test]
    fn test_wire_shape() {
        let msg = RelayMessage::Notification(RelayPayload {
            title: "Order".to_string(),
            body: "Table 5".to_string(),
            data: json!({}),
            tag: Some("onesignal-messaging".to_string()),
            icon: None,
            sent_at: Some("2024-03-15T12:00:00Z".to_string()),
        });
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "ONESIGNAL_NOTIFICATION");
        assert_eq!(value["payload"]["title"], "Order");
        assert_eq!(value["payload"]["sentAt"], "2024-03-15T12:00:00Z");
        assert_eq!(RelayMessage::from_value(value), Some(msg));
    }

    #[test]
    fn test_click_message_and_foreign_messages() {
        let click = RelayMessage::from_value(json!({
            "type": "ONESIGNAL_NOTIFICATION_CLICK",
            "payload": { "title": "Order", "body": "Table 5" }
        }))
        .unwrap();
        assert!(matches!(click, RelayMessage::Click(_)));
        assert_eq!(click.payload().title, "Order");

        assert_eq!(RelayMessage::from_value(json!({ "type": "SKIP_WAITING" })), None);
        assert_eq!(RelayMessage::from_value(json!("hello")), None);
    }

    #[test]
    fn test_one_display_one_message_per_tab() {
        let payload = PushPayload::from_value(json!({
            "notification": { "title": "Order", "body": "Table 5" }
        }));
        let shown = resolve_display(&payload, &RelayConfig::default());
        assert_eq!(shown.title, "Order");

        let clients = vec![
            client("a", "http://localhost:3000/", false),
            client("b", "http://localhost:3000/admin", true),
            client("a", "http://localhost:3000/", false),
        ];
        let message = RelayMessage::Notification(RelayPayload::from_display(&shown, "now"));
        let deliveries: Vec<(&str, &RelayMessage)> = broadcast_targets(&clients)
            .into_iter()
            .map(|c| (c.id.as_str(), &message))
            .collect();

        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[0].0, "a");
        assert_eq!(deliveries[1].0, "b");
    }

    #[test]
    fn test_click_target() {
        let clients = vec![
            client("a", "http://localhost:3000/admin", true),
            client("b", "http://localhost:3000/?tableNumber=4", false),
            client("c", "http://localhost:3000/", true),
        ];
        assert_eq!(click_target(&clients, "/"), ClickTarget::Focus(2));
        assert_eq!(click_target(&clients[..2], "/"), ClickTarget::Focus(1));
        assert_eq!(
            click_target(&clients[..1], "/"),
            ClickTarget::Open("/".to_string())
        );
        assert_eq!(click_target(&[], "/"), ClickTarget::Open("/".to_string()));
    }

    #[test]
    fn test_url_path() {
        assert_eq!(url_path("https://menu.example.com"), "/");
        assert_eq!(url_path("https://menu.example.com/admin#x"), "/admin");
        assert_eq!(url_path("/admin?x=1"), "/admin");
    }
}
