//! Staff-side list of received notifications.
//!
//! The relay channel is at-least-once and unordered, and the same
//! notification may reach the page through both the vendor SDK and the
//! service worker. The inbox therefore drops repeats and keeps entries
//! ordered by event time, whatever the arrival order.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::event::{PushEvent, PushEventKind};
use crate::shared::date_utils::parse_timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiNotification {
    pub id: String,
    pub title: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub data: Value,
    pub read: bool,
    /// Sender-provided id, when there was one
    #[serde(skip)]
    delivery_id: Option<String>,
}

impl UiNotification {
    fn from_event(event: &PushEvent, received_at: DateTime<Utc>) -> Self {
        let delivery_id = event.delivery_id();
        Self {
            id: delivery_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            title: event.title().unwrap_or_else(|| "New Message".to_string()),
            body: event.body().unwrap_or_default(),
            timestamp: parse_timestamp(&event.timestamp).unwrap_or(received_at),
            data: event.data.clone(),
            read: false,
            delivery_id,
        }
    }

    fn same_text(&self, other: &UiNotification) -> bool {
        self.title == other.title && self.body == other.body
    }

    /// Copies of one push. Ids decide when both sides carry one; otherwise
    /// (relay payloads have none) the same text within the dedup window.
    fn same_delivery(&self, other: &UiNotification) -> bool {
        if let (Some(a), Some(b)) = (&self.delivery_id, &other.delivery_id) {
            return a == b;
        }
        let gap = if self.timestamp > other.timestamp {
            self.timestamp - other.timestamp
        } else {
            other.timestamp - self.timestamp
        };
        self.same_text(other) && gap <= NotificationInbox::dedup_window()
    }

    /// A click may come any time after display, so only ids or text count
    fn clicked_by(&self, click: &UiNotification) -> bool {
        match (&self.delivery_id, &click.delivery_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.same_text(click),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationInbox {
    entries: Vec<UiNotification>,
}

impl NotificationInbox {
    pub const MAX_ENTRIES: usize = 50;

    /// Copies of one notification arriving through both delivery paths land
    /// within this window of each other
    pub fn dedup_window() -> Duration {
        Duration::seconds(10)
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// Newest first
    pub fn entries(&self) -> &[UiNotification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    /// Take in one event. Returns `true` when the inbox changed.
    ///
    /// Notifications are added unless already present; a click marks the
    /// matching entry read; subscription changes are not listed.
    pub fn receive(&mut self, event: &PushEvent) -> bool {
        self.receive_at(event, Utc::now())
    }

    pub fn receive_at(&mut self, event: &PushEvent, received_at: DateTime<Utc>) -> bool {
        let incoming = UiNotification::from_event(event, received_at);
        match event.kind {
            PushEventKind::Notification => {
                if self.entries.iter().any(|n| n.same_delivery(&incoming)) {
                    log::debug!("Dropping repeated notification '{}'", incoming.title);
                    return false;
                }
                let pos = self
                    .entries
                    .iter()
                    .position(|n| n.timestamp < incoming.timestamp)
                    .unwrap_or(self.entries.len());
                self.entries.insert(pos, incoming);
                self.entries.truncate(Self::MAX_ENTRIES);
                true
            }
            PushEventKind::Click => {
                match self
                    .entries
                    .iter_mut()
                    .find(|n| !n.read && n.clicked_by(&incoming))
                {
                    Some(entry) => {
                        entry.read = true;
                        true
                    }
                    None => false,
                }
            }
            PushEventKind::Subscription => false,
        }
    }

    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(entry) if !entry.read => {
                entry.read = true;
                true
            }
            _ => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for entry in &mut self.entries {
            entry.read = true;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push::relay::{RelayMessage, RelayPayload};
    use chrono::TimeZone;
    use serde_json::json;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn note(title: &str, secs: i64) -> PushEvent {
        PushEvent::at(
            PushEventKind::Notification,
            json!({ "title": title, "body": "Table 5" }),
            base() + Duration::seconds(secs),
        )
    }

    #[test]
    fn test_duplicate_delivery_dropped() {
        let mut inbox = NotificationInbox::new();
        let event = note("Order", 0);
        assert!(inbox.receive_at(&event, base()));
        assert!(!inbox.receive_at(&event, base()));
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox.unread_count(), 1);
    }

    #[test]
    fn test_same_notification_through_both_paths() {
        let mut inbox = NotificationInbox::new();
        let from_sdk = PushEvent::at(
            PushEventKind::Notification,
            json!({ "id": "os-1", "heading": "Order", "content": "Table 5" }),
            base(),
        );
        let from_worker = PushEvent::from_relay(RelayMessage::Notification(RelayPayload {
            title: "Order".to_string(),
            body: "Table 5".to_string(),
            sent_at: Some("2024-03-15T12:00:02.000Z".to_string()),
            ..Default::default()
        }));
        assert!(inbox.receive_at(&from_sdk, base()));
        assert!(!inbox.receive_at(&from_worker, base()));
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox.entries()[0].id, "os-1");

        // Worker copy first, SDK copy second
        let mut inbox = NotificationInbox::new();
        assert!(inbox.receive_at(&from_worker, base()));
        assert!(!inbox.receive_at(&from_sdk, base()));
        assert_eq!(inbox.len(), 1);
    }

    #[test]
    fn test_same_text_later_is_new_notification() {
        let mut inbox = NotificationInbox::new();
        inbox.receive_at(&note("Order", 0), base());
        inbox.receive_at(&note("Order", 2), base());
        assert_eq!(inbox.len(), 1);

        inbox.receive_at(&note("Order", 60), base());
        assert_eq!(inbox.len(), 2);
    }

    #[test]
    fn test_explicit_ids_decide() {
        let mut inbox = NotificationInbox::new();
        let a = PushEvent::at(
            PushEventKind::Notification,
            json!({ "id": "n1", "title": "Order", "body": "Table 5" }),
            base(),
        );
        let b = PushEvent::at(
            PushEventKind::Notification,
            json!({ "id": "n2", "title": "Order", "body": "Table 5" }),
            base(),
        );
        assert!(inbox.receive_at(&a, base()));
        assert!(inbox.receive_at(&b, base()));
        assert!(!inbox.receive_at(&a, base()));
        assert_eq!(inbox.len(), 2);
        assert!(inbox.entries().iter().any(|n| n.id == "n1"));
    }

    #[test]
    fn test_out_of_order_arrival_sorted_newest_first() {
        let mut inbox = NotificationInbox::new();
        for (title, secs) in [("second", 30), ("first", 0), ("third", 90)] {
            inbox.receive_at(&note(title, secs), base());
        }
        let titles: Vec<&str> = inbox.entries().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_click_marks_read() {
        let mut inbox = NotificationInbox::new();
        inbox.receive_at(&note("Order", 0), base());

        let click = PushEvent::at(
            PushEventKind::Click,
            json!({ "title": "Order", "body": "Table 5" }),
            base() + Duration::seconds(1),
        );
        assert!(inbox.receive_at(&click, base()));
        assert_eq!(inbox.unread_count(), 0);
        assert_eq!(inbox.len(), 1);
    }

    #[test]
    fn test_click_long_after_display() {
        let mut inbox = NotificationInbox::new();
        inbox.receive_at(&note("Order", 0), base());
        inbox.receive_at(&note("Order", 120), base());

        let click = PushEvent::at(
            PushEventKind::Click,
            json!({ "title": "Order", "body": "Table 5" }),
            base() + Duration::seconds(180),
        );
        assert!(inbox.receive_at(&click, base()));
        assert_eq!(inbox.unread_count(), 1);
        // The most recent unread copy is the one marked
        assert!(inbox.entries()[0].read);
        assert!(!inbox.entries()[1].read);

        let other = PushEvent::at(
            PushEventKind::Click,
            json!({ "title": "Order", "body": "Table 9" }),
            base() + Duration::seconds(60),
        );
        assert!(!inbox.receive_at(&other, base()));
    }

    #[test]
    fn test_subscription_not_listed() {
        let mut inbox = NotificationInbox::new();
        let event = PushEvent::at(PushEventKind::Subscription, json!({ "current": true }), base());
        assert!(!inbox.receive_at(&event, base()));
        assert!(inbox.is_empty());
    }

    #[test]
    fn test_mark_read_and_clear() {
        let mut inbox = NotificationInbox::new();
        inbox.receive_at(&note("a", 0), base());
        inbox.receive_at(&note("b", 60), base());

        let id = inbox.entries()[0].id.clone();
        assert!(inbox.mark_read(&id));
        assert!(!inbox.mark_read(&id));
        assert_eq!(inbox.unread_count(), 1);

        inbox.mark_all_read();
        assert_eq!(inbox.unread_count(), 0);

        inbox.clear();
        assert!(inbox.is_empty());
    }

    #[test]
    fn test_capacity() {
        let mut inbox = NotificationInbox::new();
        for i in 0..(NotificationInbox::MAX_ENTRIES as i64 + 5) {
            inbox.receive_at(&note(&format!("n{}", i), i * 60), base());
        }
        assert_eq!(inbox.len(), NotificationInbox::MAX_ENTRIES);
        assert_eq!(inbox.entries()[0].title, format!("n{}", NotificationInbox::MAX_ENTRIES + 4));
    }
}
