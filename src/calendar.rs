//! Family events and day-before reminders

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// `yyyy-mm-dd` key for a date
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today's date in the local timezone
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("약속 이름을 입력해 주세요.")]
    MissingTitle,

    #[error("날짜를 선택해 주세요.")]
    MissingDate,

    #[error("날짜 형식이 올바르지 않습니다: {0}")]
    InvalidDate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub icon: Option<String>,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            date,
            icon: None,
        }
    }

    pub fn date_key(&self) -> String {
        date_key(self.date)
    }

    /// Confirmation shown after creating the event
    pub fn created_message(&self) -> String {
        format!("약속 \"{}\"이(가) 생성되었습니다!", self.title)
    }
}

/// Raw form input of the event creator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub date: String,
    pub icon: Option<String>,
}

impl EventDraft {
    /// Draft pre-filled with `today`, as the creator opens
    pub fn starting(today: NaiveDate, icon: Option<String>) -> Self {
        Self {
            title: String::new(),
            date: date_key(today),
            icon,
        }
    }

    pub fn submit(&self) -> Result<CalendarEvent, EventError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(EventError::MissingTitle);
        }
        let date = self.date.trim();
        if date.is_empty() {
            return Err(EventError::MissingDate);
        }
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| EventError::InvalidDate(date.to_string()))?;

        Ok(CalendarEvent {
            title: title.to_string(),
            date,
            icon: self.icon.clone().filter(|i| !i.is_empty()),
        })
    }
}

/// Events happening the day after `today`
pub fn reminders_due(events: &[CalendarEvent], today: NaiveDate) -> Vec<&CalendarEvent> {
    let Some(tomorrow) = today.succ_opt() else {
        return Vec::new();
    };
    events.iter().filter(|e| e.date == tomorrow).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_draft_validation() {
        let mut draft = EventDraft::starting(day(2025, 11, 2), Some("🎂".into()));
        assert_eq!(draft.date, "2025-11-02");
        assert_eq!(draft.submit().unwrap_err(), EventError::MissingTitle);

        draft.title = " 이마트 나들이 ".into();
        let event = draft.submit().unwrap();
        assert_eq!(event.title, "이마트 나들이");
        assert_eq!(event.icon.as_deref(), Some("🎂"));
        assert_eq!(event.created_message(), "약속 \"이마트 나들이\"이(가) 생성되었습니다!");

        draft.date = String::new();
        assert_eq!(draft.submit().unwrap_err(), EventError::MissingDate);
        draft.date = "11/22".into();
        assert!(matches!(draft.submit(), Err(EventError::InvalidDate(_))));
    }

    #[test]
    fn test_reminders_due_tomorrow_only() {
        let events = vec![
            CalendarEvent::new("수진이 생일", day(2025, 11, 3)),
            CalendarEvent::new("나희 생일", day(2025, 11, 6)),
            CalendarEvent::new("월말 정산", day(2025, 12, 1)),
        ];

        let due = reminders_due(&events, day(2025, 11, 2));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].date_key(), "2025-11-03");

        assert_eq!(reminders_due(&events, day(2025, 11, 30))[0].title, "월말 정산");
        assert!(reminders_due(&events, day(2025, 11, 3)).is_empty());
    }
}
