//! HTTP client for the dadam backend
//!
//! Thin request/response plumbing: auth, today's balance game and today's
//! question. Responses are normalized here; deciding what the user sees on
//! failure is left to the caller.

pub mod auth;
pub mod balance;
pub mod question;

pub use auth::AuthFailure;
pub use balance::{BalanceSummary, BalanceTally, Choice, GameId, Voter};
pub use question::TodayQuestion;

use crate::config::ClientConfig;
use crate::error::{DadamError, Result};
use reqwest::{header, Client};

/// Client for the backend REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let builder = Client::builder().default_headers(headers);
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| DadamError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.api_base().to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DadamError::Http { status, body });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| DadamError::InvalidResponse(e.to_string()))
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
