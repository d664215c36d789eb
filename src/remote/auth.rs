//! Login and signup

use super::ApiClient;
use crate::session::{AuthMode, Session};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

const SIGNUP_DEFAULT_MESSAGE: &str =
    "회원가입 중 오류가 발생했습니다. 입력 정보를 다시 확인해 주세요.";

/// Why a login or signup attempt did not produce a session
///
/// `Display` is the message shown in the auth panel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("이메일과 비밀번호를 모두 입력해 주세요.")]
    MissingLoginFields,

    #[error("이름, 이메일, 비밀번호를 모두 입력해 주세요.")]
    MissingSignupFields,

    #[error("아직 가입되지 않은 이메일입니다. 30초 만에 회원가입을 완료해 보세요.")]
    UnknownEmail { email: String },

    #[error("이메일 또는 비밀번호가 올바르지 않습니다.")]
    InvalidCredentials,

    #[error("로그인 중 오류가 발생했습니다. 잠시 후 다시 시도해 주세요.")]
    LoginFailed { status: u16 },

    #[error("로그인 중 문제가 발생했습니다. 잠시 후 다시 시도해 주세요.")]
    LoginUnreachable,

    #[error("이미 가입된 이메일입니다.")]
    DuplicateEmail,

    #[error("서버 오류가 발생했습니다. 잠시 후 다시 시도해 주세요.")]
    ServerError { status: u16 },

    #[error("{0}")]
    SignupRejected(String),

    #[error("회원가입 중 문제가 발생했습니다. 잠시 후 다시 시도해 주세요.")]
    SignupUnreachable,
}

impl AuthFailure {
    /// Panel whose feedback line shows this failure
    pub fn panel(&self) -> AuthMode {
        match self {
            Self::MissingLoginFields
            | Self::InvalidCredentials
            | Self::LoginFailed { .. }
            | Self::LoginUnreachable => AuthMode::Login,
            Self::UnknownEmail { .. }
            | Self::ServerError { .. }
            | Self::MissingSignupFields
            | Self::DuplicateEmail
            | Self::SignupRejected(_)
            | Self::SignupUnreachable => AuthMode::Signup,
        }
    }
}

/// Map a failed login status to its failure
pub fn classify_login(status: u16, email: &str) -> AuthFailure {
    match status {
        404 => AuthFailure::UnknownEmail {
            email: email.to_string(),
        },
        400 | 401 => AuthFailure::InvalidCredentials,
        s => AuthFailure::LoginFailed { status: s },
    }
}

/// Map a failed signup status and response body to its failure
pub fn classify_signup(status: u16, body: &str) -> AuthFailure {
    let server_message = server_message(body);

    if status == 409 || server_message.contains("이미") {
        AuthFailure::DuplicateEmail
    } else if status >= 500 {
        AuthFailure::ServerError { status }
    } else if server_message.is_empty() {
        AuthFailure::SignupRejected(SIGNUP_DEFAULT_MESSAGE.to_string())
    } else {
        AuthFailure::SignupRejected(server_message)
    }
}

/// `message`, else `errorCode`, from a JSON error body
fn server_message(body: &str) -> String {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return String::new();
    };
    ["message", "errorCode"]
        .iter()
        .filter_map(|k| map.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignupRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    family_code: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    #[serde(default)]
    user: crate::session::User,
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Session {
            token: response.token,
            user: response.user,
        }
    }
}

impl ApiClient {
    /// POST /auth/login
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthFailure> {
        let email = email.trim();
        let password = password.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthFailure::MissingLoginFields);
        }

        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| {
                error!("Login request failed: {}", e);
                AuthFailure::LoginUnreachable
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Login failed: {} {}", status.as_u16(), body);
            return Err(classify_login(status.as_u16(), email));
        }

        let parsed: AuthResponse = response.json().await.map_err(|e| {
            error!("Malformed login response: {}", e);
            AuthFailure::LoginUnreachable
        })?;
        info!("Logged in as {}", email);
        Ok(parsed.into())
    }

    /// POST /auth/signup
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        family_code: Option<&str>,
    ) -> Result<Session, AuthFailure> {
        let name = name.trim();
        let email = email.trim();
        let password = password.trim();
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AuthFailure::MissingSignupFields);
        }
        let family_code = family_code.map(str::trim).filter(|c| !c.is_empty());

        let response = self
            .client
            .post(self.url("/auth/signup"))
            .json(&SignupRequest {
                name,
                email,
                password,
                family_code,
            })
            .send()
            .await
            .map_err(|e| {
                error!("Signup request failed: {}", e);
                AuthFailure::SignupUnreachable
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Signup failed: {} {}", status.as_u16(), body);
            return Err(classify_signup(status.as_u16(), &body));
        }

        let parsed: AuthResponse = response.json().await.map_err(|e| {
            error!("Malformed signup response: {}", e);
            AuthFailure::SignupUnreachable
        })?;
        info!("Signed up {}", email);
        Ok(parsed.into())
    }
}
