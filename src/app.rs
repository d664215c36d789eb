//! Application facade
//!
//! [`DadamApp`] owns the persisted ledgers, the HTTP client, the notice board
//! and the [`UiState`]. Every UI event maps to one method here; the caller
//! re-renders from the accessors afterwards.

use crate::answer::{Answer, AnswerError, AnswerThread, Reply};
use crate::calendar::{reminders_due, CalendarEvent, EventDraft, EventError};
use crate::config::ClientConfig;
use crate::error::{DadamError, Result};
use crate::notification::{
    Notice, NoticeBoard, NotificationLedger, NotificationRecord, NotificationType,
};
use crate::profile::{ProfileError, ProfileImages};
use crate::quiz::{QuizBoard, QuizError, QuizOption, QuizVerdict};
use crate::remote::balance::{self, BalanceSummary, BalanceTally, Choice, GameId};
use crate::remote::{ApiClient, AuthFailure};
use crate::selection::{SelectionKind, SelectionLedger, Selections};
use crate::session::{AuthMode, Modal, Session, Tone, UiState};
use crate::store::KeyedStore;
use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

const BALANCE_FALLBACK_NOTICE: &str =
    "서버에서 밸런스 게임을 불러오지 못해, 기본 문제를 보여드릴게요.";
const BALANCE_LOGIN_NOTICE: &str = "로그인 후에만 밸런스 게임에 참여할 수 있어요.";
const BALANCE_VOTE_FAILED_NOTICE: &str =
    "밸런스 게임 선택에 실패했어요. 잠시 후 다시 시도해 주세요.";
const BALANCE_OFFLINE_NOTICE: &str =
    "기본 문제는 투표할 수 없어요. 서버 연결 후 다시 시도해 주세요.";
const BALANCE_ONCE_A_DAY_NOTICE: &str =
    "오늘의 밸런스 게임은 하루에 한 번만 제공돼요. 내일 새로운 문제가 열려요.";
const LOGIN_SUCCESS_NOTICE: &str = "로그인에 성공했어요.";
const SIGNUP_SUCCESS_NOTICE: &str = "회원가입이 완료되었습니다. 로그인 상태로 전환합니다.";

pub struct DadamApp {
    config: ClientConfig,
    api: ApiClient,
    store: KeyedStore,
    notifications: NotificationLedger,
    balance_picks: SelectionLedger,
    quiz: QuizBoard,
    answers: AnswerThread,
    profiles: ProfileImages,
    notices: NoticeBoard,
    state: UiState,
}

impl DadamApp {
    /// Wire every ledger onto `store` and restore the saved session
    ///
    /// Without a saved session the intro modal starts open.
    pub fn new(config: ClientConfig, store: KeyedStore, quiz_options: Vec<QuizOption>) -> Result<Self> {
        config.validate()?;
        let api = ApiClient::new(&config)?;
        let keys = &config.storage_keys;

        let notifications = NotificationLedger::with_cap(
            store.clone(),
            keys.notifications.clone(),
            config.notification_cap,
        );
        let balance_picks = SelectionLedger::for_kind(store.clone(), SelectionKind::Balance, keys);
        let quiz = QuizBoard::new(
            SelectionLedger::for_kind(store.clone(), SelectionKind::Quiz, keys),
            quiz_options,
        );
        let answers =
            AnswerThread::load_with_limit(store.clone(), keys.answers.clone(), config.answer_max_chars);
        let profiles = ProfileImages::with_limit(
            store.clone(),
            keys.profiles.clone(),
            config.profile_image_max_bytes,
        );

        let mut state = UiState {
            session: store.read::<Option<Session>>(&keys.session),
            ..Default::default()
        };
        match &state.session {
            Some(session) => info!("Restored session for {}", session.display_name()),
            None => state.open(Modal::Intro),
        }

        info!("Dadam client ready (api: {})", api.base_url());
        Ok(Self {
            config,
            api,
            store,
            notifications,
            balance_picks,
            quiz,
            answers,
            profiles,
            notices: NoticeBoard::new(),
            state,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn notifications(&self) -> &NotificationLedger {
        &self.notifications
    }

    pub fn balance_picks(&self) -> &SelectionLedger {
        &self.balance_picks
    }

    pub fn quiz(&self) -> &QuizBoard {
        &self.quiz
    }

    pub fn answers(&self) -> &AnswerThread {
        &self.answers
    }

    pub fn profiles(&self) -> &ProfileImages {
        &self.profiles
    }

    pub fn close_modal(&mut self) {
        self.state.close_modal();
    }

    // ---- auth ----

    /// Show the auth modal on the given form
    pub fn open_auth(&mut self, mode: AuthMode, prefill_email: Option<&str>) {
        match mode {
            AuthMode::Login => self.state.auth.open_login(prefill_email, None),
            AuthMode::Signup => self.state.auth.open_signup(prefill_email, None),
        }
        self.state.open(Modal::Auth);
    }

    /// Submit the login form
    ///
    /// An unregistered email moves the user to the signup form with the
    /// email filled in; other failures show under the login form.
    pub async fn login(&mut self, email: &str, password: &str) -> std::result::Result<(), AuthFailure> {
        self.state.auth.clear_feedback(AuthMode::Login);
        match self.api.login(email, password).await {
            Ok(session) => {
                self.install_session(session, LOGIN_SUCCESS_NOTICE);
                Ok(())
            }
            Err(failure) => {
                self.show_auth_failure(&failure);
                Err(failure)
            }
        }
    }

    /// Submit the signup form; success signs the new member in
    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        family_code: Option<&str>,
    ) -> std::result::Result<(), AuthFailure> {
        self.state.auth.clear_feedback(AuthMode::Signup);
        match self.api.signup(name, email, password, family_code).await {
            Ok(session) => {
                self.install_session(session, SIGNUP_SUCCESS_NOTICE);
                Ok(())
            }
            Err(failure) => {
                self.show_auth_failure(&failure);
                Err(failure)
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.state.session.take() {
            info!("Signed out {}", session.display_name());
        }
        self.store.remove(&self.config.storage_keys.session);
        self.quiz.reset();
        self.state.auth = Default::default();
        self.state.open(Modal::Intro);
    }

    fn install_session(&mut self, session: Session, message: &str) {
        info!("Signed in as {}", session.display_name());
        self.store
            .write(&self.config.storage_keys.session, &Some(session.clone()));
        self.state.session = Some(session);

        self.state.auth.clear_feedback(AuthMode::Login);
        self.state.auth.clear_feedback(AuthMode::Signup);
        self.state.close_modal();
        self.quiz.reset();
        self.notices.push(Notice::info(message));
    }

    fn show_auth_failure(&mut self, failure: &AuthFailure) {
        let message = failure.to_string();
        match failure {
            AuthFailure::UnknownEmail { email } => {
                self.state.auth.open_signup(Some(email.as_str()), Some(message.as_str()));
            }
            _ => self
                .state
                .auth
                .show_feedback(failure.panel(), message, Tone::Error),
        }
        self.state.open(Modal::Auth);
    }

    // ---- balance game (server) ----

    /// Fetch today's balance game, falling back to the built-in pool
    pub async fn load_balance_game(&mut self, today: NaiveDate) -> &BalanceSummary {
        let summary = match self.api.fetch_today().await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Using fallback balance game: {}", e);
                self.notices.push(Notice::error(BALANCE_FALLBACK_NOTICE));
                balance::fallback_for(today)
            }
        };
        &*self.state.balance.insert(summary)
    }

    /// Vote on today's balance game as the signed-in member
    ///
    /// Nothing is sent until a game has been loaded.
    pub async fn vote_balance(&mut self, choice: Choice) -> Result<&BalanceSummary> {
        if self.state.balance.is_none() {
            debug!("Ignoring {:?} vote, no balance game loaded", choice);
            return Err(DadamError::NoBalanceGame);
        }

        let Some(token) = self.state.token().map(str::to_string) else {
            self.notices.push(Notice::error(BALANCE_LOGIN_NOTICE));
            self.open_auth(AuthMode::Login, None);
            return Err(DadamError::LoginRequired);
        };

        if let Some(Some(GameId::Fallback(id))) = self.state.balance.as_ref().map(|b| &b.id) {
            let id = id.clone();
            self.notices.push(Notice::error(BALANCE_OFFLINE_NOTICE));
            return Err(DadamError::OfflineGame(id));
        }

        let name = self.state.member().name;
        match self.api.vote(choice, &token).await {
            Ok(mut summary) => {
                if summary.apply_vote_placeholder(choice, &name) {
                    debug!("Vote not reflected yet, showing {} locally", name);
                }
                self.notices.push(Notice::info(format!(
                    "{}님이 밸런스 게임에서 \"{}\"를 선택했어요.",
                    name,
                    summary.option_text(choice)
                )));
                Ok(&*self.state.balance.insert(summary))
            }
            Err(e) => {
                self.notices.push(Notice::error(BALANCE_VOTE_FAILED_NOTICE));
                Err(e)
            }
        }
    }

    /// "Another topic" button; one game per day
    pub fn request_new_balance(&self) {
        self.notices.push(Notice::info(BALANCE_ONCE_A_DAY_NOTICE));
    }

    pub fn balance_tally(&self) -> Option<BalanceTally> {
        self.state.balance.as_ref().map(BalanceSummary::tally)
    }

    // ---- local widgets ----

    /// Record a local balance pick for the current member
    pub fn pick_balance_option(&self, option: &str) -> Selections {
        let member = self.state.member();
        let selections = self.balance_picks.record_selection(option, &member.id);

        self.notifications.record(
            NotificationType::Balance,
            format!("{}님이 밸런스 게임에서 \"{}\"을(를) 선택했습니다.", member.name, option),
            object(json!({ "option": option, "user": member.name })),
        );
        selections
    }

    pub fn select_quiz_option(&mut self, option: &str) -> std::result::Result<(), QuizError> {
        let member = self.state.member();
        self.quiz.select(option, &member.id)
    }

    /// Grade the quiz and record the result as a notification
    pub fn check_quiz(&mut self) -> std::result::Result<QuizVerdict, QuizError> {
        let verdict = self.quiz.check()?;
        let member = self.state.member();

        self.notifications.record(
            NotificationType::Quiz,
            format!(
                "{}님이 신조어 퀴즈에서 \"{}\"을(를) 선택했습니다. ({})",
                member.name,
                verdict.option,
                if verdict.correct { "정답" } else { "오답" }
            ),
            object(json!({ "option": verdict.option, "correct": verdict.correct })),
        );
        Ok(verdict)
    }

    // ---- answers ----

    /// Post the current member's answer to today's question
    pub fn submit_answer(&mut self, content: &str) -> std::result::Result<Answer, AnswerError> {
        let author = self.state.member().name;
        let answer = self.answers.submit_answer(&author, content)?.clone();

        self.notifications.record(
            NotificationType::Answer,
            format!("{}님이 질문에 답변했습니다.", answer.author),
            object(json!({ "author": answer.author, "answerId": answer.id })),
        );
        Ok(answer)
    }

    /// Open the detail modal of an answer
    pub fn open_answer(&mut self, answer_id: i64) -> Option<&Answer> {
        let answer = self.answers.find(answer_id)?;
        self.state.modal = Some(Modal::Answer(answer_id));
        Some(answer)
    }

    pub fn reply_to_answer(
        &mut self,
        answer_id: i64,
        content: &str,
    ) -> std::result::Result<&Reply, AnswerError> {
        let author = self.state.member().name;
        self.answers.add_reply(answer_id, &author, content)
    }

    /// Reply under the answer whose detail modal is open
    pub fn reply_in_open_answer(&mut self, content: &str) -> Option<std::result::Result<&Reply, AnswerError>> {
        let answer_id = self.state.open_answer_id()?;
        Some(self.reply_to_answer(answer_id, content))
    }

    // ---- notifications ----

    /// Open the notification panel; returns its contents, newest first
    pub fn open_notifications(&mut self) -> Vec<NotificationRecord> {
        self.state.open(Modal::Notifications);
        self.notifications.list()
    }

    pub fn mark_notification_read(&self, id: i64) -> bool {
        self.notifications.mark_read(id)
    }

    // ---- events ----

    /// Record a reminder for every event happening tomorrow
    pub fn remind_upcoming(&self, events: &[CalendarEvent], today: NaiveDate) -> Vec<NotificationRecord> {
        reminders_due(events, today)
            .into_iter()
            .filter_map(|event| {
                self.notifications
                    .upsert_calendar_reminder(&event.title, &event.date_key())
            })
            .collect()
    }

    pub fn open_event_creator(&mut self, today: NaiveDate, icon: Option<String>) -> EventDraft {
        self.state.open(Modal::EventCreator);
        EventDraft::starting(today, icon)
    }

    /// Validate the creator form and keep the event for this session
    pub fn create_event(&mut self, draft: &EventDraft) -> std::result::Result<CalendarEvent, EventError> {
        let event = draft.submit()?;
        self.notices.push(Notice::info(event.created_message()));
        self.state.events.push(event.clone());
        self.state.close_modal();
        Ok(event)
    }

    // ---- profiles ----

    /// Store a profile photo for the current member
    pub fn upload_profile_photo(
        &self,
        mime_type: &str,
        bytes: &[u8],
    ) -> std::result::Result<String, ProfileError> {
        let member = self.state.member();
        self.profiles.upload(&member.id, mime_type, bytes)
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl std::fmt::Debug for DadamApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DadamApp")
            .field("api", &self.api.base_url())
            .field("signed_in", &self.state.is_signed_in())
            .field("modal", &self.state.modal)
            .finish_non_exhaustive()
    }
}
