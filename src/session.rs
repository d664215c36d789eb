//! Signed-in session and the explicit UI state the app hands to its renderer

use crate::calendar::CalendarEvent;
use crate::remote::balance::BalanceSummary;
use crate::store::Document;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name used when the current user has none
pub const FALLBACK_NAME: &str = "나";

/// Voter id used before anyone signs in
pub const GUEST_ID: &str = "guest";

/// User profile as returned by the auth endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub family_code: Option<String>,
    /// Fields this client does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Token and user installed after login or signup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Document for Option<Session> {}

impl Session {
    /// Display name, or "나"
    pub fn display_name(&self) -> &str {
        self.user
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(FALLBACK_NAME)
    }

    pub fn member(&self) -> Member {
        let id = self
            .user
            .id
            .map(|id| id.to_string())
            .or_else(|| self.user.email.clone())
            .unwrap_or_else(|| self.display_name().to_string());
        Member {
            id,
            name: self.display_name().to_string(),
        }
    }
}

/// The person acting in the local widgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Voter id in the selection ledgers
    pub id: String,
    /// Author name on answers and notifications
    pub name: String,
}

impl Member {
    pub fn guest() -> Self {
        Self {
            id: GUEST_ID.to_string(),
            name: FALLBACK_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Error,
}

/// Inline message under an auth form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub tone: Tone,
}

/// Login/signup panel state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthPanel {
    pub mode: AuthMode,
    pub login_email: String,
    pub signup_email: String,
    pub login_feedback: Option<Feedback>,
    pub signup_feedback: Option<Feedback>,
}

impl AuthPanel {
    /// Switch to the login form, optionally pre-filling the email
    pub fn open_login(&mut self, prefill_email: Option<&str>, message: Option<&str>) {
        self.mode = AuthMode::Login;
        self.signup_feedback = None;
        if let Some(email) = prefill_email.filter(|e| !e.is_empty()) {
            self.login_email = email.to_string();
        }
        self.login_feedback = message.map(|m| Feedback {
            message: m.to_string(),
            tone: Tone::Info,
        });
    }

    /// Switch to the signup form, optionally pre-filling the email
    pub fn open_signup(&mut self, prefill_email: Option<&str>, message: Option<&str>) {
        self.mode = AuthMode::Signup;
        self.login_feedback = None;
        if let Some(email) = prefill_email.filter(|e| !e.is_empty()) {
            self.signup_email = email.to_string();
        }
        self.signup_feedback = message.map(|m| Feedback {
            message: m.to_string(),
            tone: Tone::Info,
        });
    }

    pub fn show_feedback(&mut self, target: AuthMode, message: impl Into<String>, tone: Tone) {
        let feedback = Some(Feedback {
            message: message.into(),
            tone,
        });
        match target {
            AuthMode::Login => self.login_feedback = feedback,
            AuthMode::Signup => self.signup_feedback = feedback,
        }
    }

    pub fn clear_feedback(&mut self, target: AuthMode) {
        match target {
            AuthMode::Login => self.login_feedback = None,
            AuthMode::Signup => self.signup_feedback = None,
        }
    }

    pub fn feedback(&self, target: AuthMode) -> Option<&Feedback> {
        match target {
            AuthMode::Login => self.login_feedback.as_ref(),
            AuthMode::Signup => self.signup_feedback.as_ref(),
        }
    }
}

/// The one modal that may be open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Intro,
    Auth,
    Notifications,
    /// Answer detail with its replies
    Answer(i64),
    EventCreator,
}

/// Everything the renderer needs besides the persisted ledgers
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub session: Option<Session>,
    pub auth: AuthPanel,
    pub modal: Option<Modal>,
    /// Today's balance game as last shown
    pub balance: Option<BalanceSummary>,
    /// Events created this session
    pub events: Vec<CalendarEvent>,
}

impl UiState {
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn member(&self) -> Member {
        self.session
            .as_ref()
            .map(Session::member)
            .unwrap_or_else(Member::guest)
    }

    pub fn open(&mut self, modal: Modal) {
        self.modal = Some(modal);
    }

    /// Close whatever is open (Escape key)
    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Answer whose detail modal is open
    pub fn open_answer_id(&self) -> Option<i64> {
        match self.modal {
            Some(Modal::Answer(id)) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(name: Option<&str>, id: Option<i64>) -> Session {
        Session {
            token: "t".into(),
            user: User {
                id,
                name: name.map(str::to_string),
                email: Some("sujin@example.com".into()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_user_keeps_unknown_fields() {
        let user: User = serde_json::from_str(
            r#"{"id":3,"name":"윤수진","email":"s@example.com","familyCode":"F-1","role":"CHILD"}"#,
        )
        .unwrap();

        assert_eq!(user.family_code.as_deref(), Some("F-1"));
        assert_eq!(user.extra["role"], "CHILD");
    }

    #[test]
    fn test_member_identity() {
        assert_eq!(session(Some("수진"), Some(7)).member(), Member { id: "7".into(), name: "수진".into() });
        assert_eq!(session(Some("  "), None).member().name, FALLBACK_NAME);
        assert_eq!(session(None, None).member().id, "sujin@example.com");
        assert_eq!(UiState::default().member(), Member::guest());
    }

    #[test]
    fn test_signup_switch_moves_feedback() {
        let mut panel = AuthPanel::default();
        panel.show_feedback(AuthMode::Login, "bad", Tone::Error);

        panel.open_signup(Some("new@example.com"), Some("가입해 주세요"));
        assert_eq!(panel.mode, AuthMode::Signup);
        assert_eq!(panel.signup_email, "new@example.com");
        assert!(panel.login_feedback.is_none());
        assert_eq!(panel.feedback(AuthMode::Signup).unwrap().message, "가입해 주세요");

        panel.open_login(None, None);
        assert_eq!(panel.mode, AuthMode::Login);
        assert!(panel.signup_feedback.is_none());
        assert!(panel.login_feedback.is_none());
    }

    #[test]
    fn test_modal_target() {
        let mut state = UiState::default();
        state.open(Modal::Answer(42));
        assert_eq!(state.open_answer_id(), Some(42));
        state.close_modal();
        assert_eq!(state.open_answer_id(), None);
    }
}
