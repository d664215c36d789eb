//! Notification center
//!
//! Persistent notifications (`NotificationLedger`) record user actions of
//! interest and are listed newest first, bounded to the configured cap.
//! Transient toasts raised by remote calls go through [`NoticeBoard`]
//! instead and are never stored.

mod format;
mod notice;

pub use format::{format_relative, format_relative_now};
pub use notice::{Notice, NoticeBoard, NoticeLevel};

use crate::store::{Document, KeyedStore};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Default number of notifications kept
pub const DEFAULT_CAP: usize = 50;

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Calendar,
    Answer,
    Quiz,
    Balance,
}

impl NotificationType {
    /// Icon shown next to the notification
    pub fn icon(self) -> &'static str {
        match self {
            NotificationType::Calendar => "📅",
            NotificationType::Answer => "💬",
            NotificationType::Quiz => "📝",
            NotificationType::Balance => "⚖️",
        }
    }
}

/// A stored notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Creation time in milliseconds since the epoch
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub message: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub read: bool,
    /// ISO-8601 creation time
    pub timestamp: String,
}

impl NotificationRecord {
    /// String field of the payload
    pub fn data_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    fn is_reminder_for(&self, event_name: &str, event_date: &str) -> bool {
        self.kind == NotificationType::Calendar
            && self.data_str("eventName") == Some(event_name)
            && self.data_str("eventDate") == Some(event_date)
    }
}

/// Stored notification list, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationList(pub Vec<NotificationRecord>);

impl Document for NotificationList {}

/// Bounded, newest-first notification list
#[derive(Debug, Clone)]
pub struct NotificationLedger {
    store: KeyedStore,
    key: String,
    cap: usize,
}

impl NotificationLedger {
    pub fn new(store: KeyedStore, key: impl Into<String>) -> Self {
        Self::with_cap(store, key, DEFAULT_CAP)
    }

    pub fn with_cap(store: KeyedStore, key: impl Into<String>, cap: usize) -> Self {
        Self {
            store,
            key: key.into(),
            cap: cap.max(1),
        }
    }

    /// Record a new notification at the head of the list
    pub fn record(
        &self,
        kind: NotificationType,
        message: impl Into<String>,
        data: Map<String, Value>,
    ) -> NotificationRecord {
        self.record_at(kind, message.into(), data, Utc::now())
    }

    fn record_at(
        &self,
        kind: NotificationType,
        message: String,
        data: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> NotificationRecord {
        let mut list = self.load();

        let mut id = now.timestamp_millis();
        if let Some(head) = list.first() {
            id = id.max(head.id.saturating_add(1));
        }

        let record = NotificationRecord {
            id,
            kind,
            message,
            data,
            read: false,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        list.insert(0, record.clone());
        list.truncate(self.cap);
        self.save(list);

        debug!(
            "Recorded {:?} notification {} ({} unread)",
            kind,
            id,
            self.unread_count()
        );
        record
    }

    /// Mark a notification as read; returns whether anything changed
    pub fn mark_read(&self, id: i64) -> bool {
        let mut list = self.load();
        match list.iter_mut().find(|n| n.id == id) {
            Some(record) if !record.read => {
                record.read = true;
                self.save(list);
                true
            }
            _ => false,
        }
    }

    /// Number of unread notifications
    pub fn unread_count(&self) -> usize {
        self.load().iter().filter(|n| !n.read).count()
    }

    /// Badge text: `None` when nothing is unread, capped at "99+"
    pub fn badge_label(&self) -> Option<String> {
        match self.unread_count() {
            0 => None,
            n if n > 99 => Some("99+".to_string()),
            n => Some(n.to_string()),
        }
    }

    /// Record a reminder for an event unless one with the same name and
    /// date is already stored
    pub fn upsert_calendar_reminder(
        &self,
        event_name: &str,
        event_date: &str,
    ) -> Option<NotificationRecord> {
        if self
            .load()
            .iter()
            .any(|n| n.is_reminder_for(event_name, event_date))
        {
            debug!("Reminder for {} on {} already recorded", event_name, event_date);
            return None;
        }

        let mut data = Map::new();
        data.insert("eventName".into(), Value::from(event_name));
        data.insert("eventDate".into(), Value::from(event_date));

        Some(self.record(
            NotificationType::Calendar,
            format!("내일 \"{}\" 일정이 있습니다.", event_name),
            data,
        ))
    }

    /// All notifications, newest first
    pub fn list(&self) -> Vec<NotificationRecord> {
        self.load()
    }

    fn load(&self) -> Vec<NotificationRecord> {
        self.store.read::<NotificationList>(&self.key).0
    }

    fn save(&self, list: Vec<NotificationRecord>) {
        self.store.write(&self.key, &NotificationList(list));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ledger() -> NotificationLedger {
        NotificationLedger::new(KeyedStore::in_memory(), "dadam_notifications_v1")
    }

    #[test]
    fn test_record_prepends() {
        let ledger = ledger();
        let first = ledger.record(NotificationType::Quiz, "first", Map::new());
        let second = ledger.record(NotificationType::Balance, "second", Map::new());

        let list = ledger.list();
        assert_eq!(list[0].id, second.id);
        assert_eq!(list[1].id, first.id);
        assert!(second.id > first.id);
        assert!(!second.read);
    }

    #[test]
    fn test_list_bounded_to_cap() {
        let ledger = ledger();
        let mut last = None;
        for i in 0..60 {
            last = Some(ledger.record(NotificationType::Answer, format!("n{}", i), Map::new()));
            assert!(ledger.list().len() <= DEFAULT_CAP);
        }

        let list = ledger.list();
        assert_eq!(list.len(), DEFAULT_CAP);
        assert_eq!(list[0].id, last.unwrap().id);
        assert_eq!(list[0].message, "n59");
        assert_eq!(list[DEFAULT_CAP - 1].message, "n10");
    }

    #[test]
    fn test_timestamp_and_id_from_clock() {
        let ledger = ledger();
        let now = Utc.with_ymd_and_hms(2025, 11, 2, 9, 30, 0).unwrap();
        let record = ledger.record_at(NotificationType::Calendar, "x".into(), Map::new(), now);

        assert_eq!(record.id, now.timestamp_millis());
        assert_eq!(record.timestamp, "2025-11-02T09:30:00.000Z");

        let again = ledger.record_at(NotificationType::Calendar, "y".into(), Map::new(), now);
        assert_eq!(again.id, record.id + 1);
    }

    #[test]
    fn test_id_saturates_at_max() {
        let store = KeyedStore::in_memory();
        let ledger = NotificationLedger::new(store.clone(), "n");
        let head = ledger.record(NotificationType::Quiz, "head", Map::new());
        store.write(
            "n",
            &NotificationList(vec![NotificationRecord {
                id: i64::MAX,
                ..head
            }]),
        );

        let next = ledger.record(NotificationType::Quiz, "next", Map::new());
        assert_eq!(next.id, i64::MAX);
        assert_eq!(ledger.list().len(), 2);
    }

    #[test]
    fn test_mark_read_and_badge() {
        let ledger = ledger();
        let a = ledger.record(NotificationType::Quiz, "a", Map::new());
        ledger.record(NotificationType::Quiz, "b", Map::new());
        assert_eq!(ledger.unread_count(), 2);
        assert_eq!(ledger.badge_label().as_deref(), Some("2"));

        assert!(ledger.mark_read(a.id));
        assert!(!ledger.mark_read(a.id));
        assert!(!ledger.mark_read(-1));
        assert_eq!(ledger.unread_count(), 1);

        let unread = ledger.list().iter().filter(|n| !n.read).count();
        assert_eq!(ledger.unread_count(), unread);
    }

    #[test]
    fn test_badge_caps_at_99() {
        let ledger = NotificationLedger::with_cap(KeyedStore::in_memory(), "n", 200);
        assert_eq!(ledger.badge_label(), None);
        for _ in 0..100 {
            ledger.record(NotificationType::Balance, "x", Map::new());
        }
        assert_eq!(ledger.badge_label().as_deref(), Some("99+"));
    }

    #[test]
    fn test_calendar_reminder_deduplicated() {
        let ledger = ledger();
        let first = ledger.upsert_calendar_reminder("수진이 생일", "2025-11-03");
        let second = ledger.upsert_calendar_reminder("수진이 생일", "2025-11-03");

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(ledger.list().len(), 1);
        assert_eq!(ledger.list()[0].message, "내일 \"수진이 생일\" 일정이 있습니다.");
    }

    #[test]
    fn test_calendar_reminder_matches_both_fields() {
        let ledger = ledger();
        ledger.upsert_calendar_reminder("수진이 생일", "2025-11-03");

        assert!(ledger.upsert_calendar_reminder("수진이 생일", "2026-11-03").is_some());
        assert!(ledger.upsert_calendar_reminder("나희 생일", "2025-11-03").is_some());

        let mut data = Map::new();
        data.insert("eventName".into(), Value::from("이마트 나들이"));
        data.insert("eventDate".into(), Value::from("2025-11-22"));
        ledger.record(NotificationType::Answer, "not a reminder", data);
        assert!(ledger.upsert_calendar_reminder("이마트 나들이", "2025-11-22").is_some());

        assert_eq!(ledger.list().len(), 5);
    }

    #[test]
    fn test_wire_shape() {
        let ledger = ledger();
        ledger.record(NotificationType::Balance, "m", Map::new());
        let raw = ledger.store.raw("dadam_notifications_v1").unwrap();

        assert!(raw.contains("\"type\":\"balance\""));
        assert!(raw.contains("\"read\":false"));
    }
}
