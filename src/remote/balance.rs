//! Today's balance game (A/B vote)

use super::{bearer, ApiClient};
use crate::error::{DadamError, Result};
use chrono::{Datelike, NaiveDate};
use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

const DEFAULT_QUESTION: &str = "가족 밸런스 게임";
const DEFAULT_OPTION_A: &str = "A 선택지";
const DEFAULT_OPTION_B: &str = "B 선택지";
const DEFAULT_CATEGORY: &str = "ETC";

/// Label for a voter without a name
pub const ANONYMOUS_LABEL: &str = "가족";

/// Game identity
///
/// Whatever id the server sends (number or string) is a `Remote` game.
/// `Fallback` is only produced by [`fallback_for`] and never reaches the
/// server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameId {
    Remote(String),
    Fallback(String),
}

impl GameId {
    fn from_server(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Remote(n.to_string())),
            Value::String(s) if !s.trim().is_empty() => Some(Self::Remote(s.trim().to_string())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
}

impl Voter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            user_id: None,
            user_name: Some(name.into()),
        }
    }

    /// Short avatar label for this voter
    pub fn avatar_label(&self) -> String {
        avatar_label(self.user_name.as_deref())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(Self::named(name)),
            Value::Object(map) => Some(Self {
                user_id: map.get("userId").and_then(Value::as_i64),
                user_name: map
                    .get("userName")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
            _ => None,
        }
    }
}

/// Normalized view of a balance game and its votes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub id: Option<GameId>,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub category: String,
    pub votes_a: Vec<Voter>,
    pub votes_b: Vec<Voter>,
}

impl BalanceSummary {
    /// Build a summary from any server payload, filling gaps with defaults
    pub fn normalize(raw: Value) -> Result<Self> {
        let Value::Object(mut map) = raw else {
            return Err(DadamError::InvalidResponse(
                "balance game payload is not an object".into(),
            ));
        };

        let id = map.get("id").and_then(GameId::from_server);

        let summary = Self {
            id,
            question: text_or(map.get("question"), DEFAULT_QUESTION),
            option_a: text_or(map.get("optionA"), DEFAULT_OPTION_A),
            option_b: text_or(map.get("optionB"), DEFAULT_OPTION_B),
            category: text_or(map.get("category"), DEFAULT_CATEGORY),
            votes_a: voters(map.remove("votesA")),
            votes_b: voters(map.remove("votesB")),
        };
        debug!(
            "Normalized balance game {:?}: {} vs {} ({} / {} votes)",
            summary.id,
            summary.option_a,
            summary.option_b,
            summary.votes_a.len(),
            summary.votes_b.len()
        );
        Ok(summary)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.id, Some(GameId::Fallback(_)))
    }

    pub fn option_text(&self, choice: Choice) -> &str {
        match choice {
            Choice::A => &self.option_a,
            Choice::B => &self.option_b,
        }
    }

    pub fn has_votes(&self) -> bool {
        !self.votes_a.is_empty() || !self.votes_b.is_empty()
    }

    /// Show `name` on the chosen side when the server has not reflected the
    /// vote yet (both lists empty). Returns whether a placeholder was added.
    pub fn apply_vote_placeholder(&mut self, choice: Choice, name: &str) -> bool {
        if self.has_votes() {
            return false;
        }
        let me = Voter::named(name);
        match choice {
            Choice::A => self.votes_a = vec![me],
            Choice::B => self.votes_b = vec![me],
        }
        true
    }

    /// Percentages and avatar labels for rendering
    pub fn tally(&self) -> BalanceTally {
        let a = self.votes_a.len();
        let total = a + self.votes_b.len();
        let percent_a = if total == 0 {
            0
        } else {
            (a as f64 / total as f64 * 100.0).round() as u8
        };
        let percent_b = if total == 0 { 0 } else { 100 - percent_a };

        BalanceTally {
            percent_a,
            percent_b,
            avatars_a: self.votes_a.iter().map(Voter::avatar_label).collect(),
            avatars_b: self.votes_b.iter().map(Voter::avatar_label).collect(),
        }
    }
}

/// Derived render data for the vote bars
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceTally {
    pub percent_a: u8,
    pub percent_b: u8,
    pub avatars_a: Vec<String>,
    pub avatars_b: Vec<String>,
}

struct PoolEntry {
    id: &'static str,
    question: &'static str,
    a: &'static str,
    b: &'static str,
}

const FALLBACK_POOL: [PoolEntry; 4] = [
    PoolEntry {
        id: "food-ramen-chicken",
        question: "평생 한 가지 음식만 먹어야 한다면?",
        a: "라면 🍜",
        b: "치킨 🍗",
    },
    PoolEntry {
        id: "trip-mountain-sea",
        question: "가족 여행지로 한 곳만 고른다면?",
        a: "바다 여행 🏖️",
        b: "산속 캠핑 ⛺",
    },
    PoolEntry {
        id: "time-morning-night",
        question: "가족이 같이 보내기 좋은 시간대는?",
        a: "아침 브런치 타임 ☕",
        b: "늦은 밤 수다 타임 🌙",
    },
    PoolEntry {
        id: "home-movie-outside",
        question: "주말에 뭐가 더 좋아?",
        a: "집에서 영화 몰아보기 🎬",
        b: "밖에 나가 액티비티 🏃",
    },
];

/// Built-in game for `date`, used when the server is unreachable
///
/// The pick rotates daily and is stable within a day. It carries no votes.
pub fn fallback_for(date: NaiveDate) -> BalanceSummary {
    let index = date.num_days_from_ce().rem_euclid(FALLBACK_POOL.len() as i32) as usize;
    let entry = &FALLBACK_POOL[index];
    BalanceSummary {
        id: Some(GameId::Fallback(entry.id.to_string())),
        question: entry.question.to_string(),
        option_a: entry.a.to_string(),
        option_b: entry.b.to_string(),
        category: DEFAULT_CATEGORY.to_string(),
        votes_a: Vec::new(),
        votes_b: Vec::new(),
    }
}

/// Short avatar label for a display name
///
/// Uses the last whitespace-separated part; a three-syllable Hangul name
/// drops its family name ("윤수진" → "수진").
pub fn avatar_label(raw_name: Option<&str>) -> String {
    let name = raw_name.map(str::trim).unwrap_or_default();
    let Some(last) = name.split_whitespace().last() else {
        return ANONYMOUS_LABEL.to_string();
    };

    let is_hangul = last.chars().all(|c| ('가'..='힣').contains(&c));
    if is_hangul && last.chars().count() == 3 {
        return last.chars().skip(1).collect();
    }
    last.to_string()
}

fn text_or(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn voters(value: Option<Value>) -> Vec<Voter> {
    match value {
        Some(Value::Array(items)) => items.into_iter().filter_map(Voter::from_value).collect(),
        _ => Vec::new(),
    }
}

#[derive(Serialize)]
struct VoteRequest {
    choice: Choice,
}

impl ApiClient {
    /// GET /balance/today
    pub async fn fetch_today(&self) -> Result<BalanceSummary> {
        let url = self.url("/balance/today");
        let response = self.client.get(&url).send().await?;
        let raw: Value = Self::handle_response(response).await.map_err(|e| {
            error!("Failed to fetch balance game: {}", e);
            e
        })?;
        BalanceSummary::normalize(raw)
    }

    /// POST /balance/today/vote
    pub async fn vote(&self, choice: Choice, token: &str) -> Result<BalanceSummary> {
        let url = self.url("/balance/today/vote");
        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, bearer(token))
            .json(&VoteRequest { choice })
            .send()
            .await?;
        let raw: Value = Self::handle_response(response).await.map_err(|e| {
            error!("Failed to vote {:?}: {}", choice, e);
            e
        })?;
        BalanceSummary::normalize(raw)
    }
}
