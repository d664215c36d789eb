//! Dadam client - family app state and sync core
//!
//! Client-side core of the dadam family app: auth, today's balance game,
//! today's question with answers and replies, profile photos, a notification
//! center and a small event creator.
//!
//! # Architecture
//!
//! State lives in two places:
//! - **Backend**: auth, balance-game votes and today's question, reached
//!   through [`ApiClient`]
//! - **Key-value store**: profiles, quiz/balance picks, notifications,
//!   answers and the session, each an independent document in a
//!   [`KeyedStore`] (memory, files on native, `localStorage` with `wasm`)
//!
//! [`DadamApp`] wires both together and keeps the UI state the renderer
//! draws from.
//!
//! # Example
//!
//! ```rust,ignore
//! use dadam_client::{ClientConfig, DadamApp, KeyedStore, FileBackend, Choice};
//!
//! let config = ClientConfig::load("dadam.toml")?.with_env_overrides();
//! let store = KeyedStore::new(FileBackend::open(FileBackend::default_dir())?);
//! let mut app = DadamApp::new(config, store, quiz_options)?;
//!
//! app.login("sujin@example.com", "secret").await?;
//! app.load_balance_game(dadam_client::calendar::local_today()).await;
//! app.vote_balance(Choice::A).await?;
//!
//! for notice in app.notices().drain() {
//!     println!("{}", notice.message);
//! }
//! ```

// Error types
pub mod error;

// Configuration
pub mod config;

// Logging setup
pub mod telemetry;

// Persisted documents
pub mod store;

// Local widgets and ledgers
pub mod answer;
pub mod calendar;
pub mod notification;
pub mod profile;
pub mod quiz;
pub mod selection;

// Backend API
pub mod remote;

// Session and UI state
pub mod session;

// Facade
pub mod app;

pub use error::{DadamError, Result};

pub use config::{ClientConfig, StorageKeys};

pub use store::{Document, FileBackend, KeyValueBackend, KeyedStore, MemoryBackend};
#[cfg(feature = "wasm")]
pub use store::LocalStorageBackend;

pub use answer::{Answer, AnswerError, AnswerThread, Reply};
pub use calendar::{CalendarEvent, EventDraft, EventError};
pub use notification::{
    Notice, NoticeBoard, NoticeLevel, NotificationLedger, NotificationRecord, NotificationType,
};
pub use profile::{ProfileError, ProfileImages};
pub use quiz::{QuizBoard, QuizError, QuizOption, QuizVerdict};
pub use selection::{SelectionKind, SelectionLedger, Selections};

pub use remote::{
    ApiClient, AuthFailure, BalanceSummary, BalanceTally, Choice, GameId, TodayQuestion, Voter,
};

pub use session::{AuthMode, AuthPanel, Modal, Session, UiState, User};

pub use app::DadamApp;
