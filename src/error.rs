//! Error types for the dadam client

use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, DadamError>;

/// Client error types
///
/// User-facing validation failures live in their own enums next to the
/// operation that raises them (`AnswerError`, `AuthFailure`, ...). This type
/// covers the plumbing underneath.
#[derive(Error, Debug)]
pub enum DadamError {
    /// Key-value backend failure (quota, unavailable storage)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Network error (offline, timeout, connection refused)
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Operation needs a signed-in session
    #[error("로그인 후에만 이용할 수 있어요.")]
    LoginRequired,

    /// Voting before today's balance game was loaded
    #[error("No balance game loaded")]
    NoBalanceGame,

    /// Locally generated game that must not reach the server
    #[error("Offline game cannot be submitted: {0}")]
    OfflineGame(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DadamError {
    /// HTTP status of a server rejection, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            DadamError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DadamError {
    fn from(err: reqwest::Error) -> Self {
        DadamError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for DadamError {
    fn from(err: serde_json::Error) -> Self {
        DadamError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for DadamError {
    fn from(err: toml::de::Error) -> Self {
        DadamError::Config(err.to_string())
    }
}

impl From<std::io::Error> for DadamError {
    fn from(err: std::io::Error) -> Self {
        DadamError::Storage(err.to_string())
    }
}
