//! Today's question: answers and their replies
//!
//! The whole thread is persisted as one document. Each author may leave a
//! single top-level answer; replies are unrestricted.

use crate::store::{Document, KeyedStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Default maximum characters in an answer
pub const DEFAULT_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub author: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Creation time in milliseconds
    pub id: i64,
    pub author: String,
    pub content: String,
    pub time_label: String,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerList(pub Vec<Answer>);

impl Document for AnswerList {}

/// Why an answer or reply was not accepted; `Display` is the user-facing text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnswerError {
    #[error("내용을 입력해 주세요.")]
    Empty,

    #[error("답변은 {max}자 이하로 작성해 주세요.")]
    TooLong { max: usize },

    #[error("이미 오늘의 질문에 답변을 남기셨어요.\n한 사람당 하나의 답변만 작성할 수 있어요.")]
    AlreadyAnswered,

    #[error("답변을 찾을 수 없어요.")]
    AnswerNotFound(i64),
}

/// Counter text under the answer box, e.g. "12 / 100"
pub fn char_count_label(text: &str, max: usize) -> String {
    format!("{} / {}", text.chars().count(), max)
}

/// In-memory thread mirrored to the store on every change
#[derive(Debug)]
pub struct AnswerThread {
    store: KeyedStore,
    key: String,
    max_chars: usize,
    answers: Vec<Answer>,
}

impl AnswerThread {
    /// Load the thread, seeding two example answers when it is empty
    pub fn load(store: KeyedStore, key: impl Into<String>) -> Self {
        Self::load_with_limit(store, key, DEFAULT_MAX_CHARS)
    }

    pub fn load_with_limit(store: KeyedStore, key: impl Into<String>, max_chars: usize) -> Self {
        let key = key.into();
        let answers = store.read::<AnswerList>(&key).0;

        let mut thread = Self {
            store,
            key,
            max_chars,
            answers,
        };

        if thread.answers.is_empty() {
            thread.seed();
        }
        thread
    }

    fn seed(&mut self) {
        let now = Utc::now().timestamp_millis();
        self.answers = vec![
            Answer {
                id: now,
                author: "수진".into(),
                content: "나희가 먹고싶은거는 다 좋아".into(),
                time_label: "2분 전".into(),
                replies: Vec::new(),
            },
            Answer {
                id: now - 1,
                author: "민규".into(),
                content: "나는 햄부기".into(),
                time_label: "10분 전".into(),
                replies: Vec::new(),
            },
        ];
        self.persist();
        info!("Seeded empty answer thread");
    }

    /// Answers, newest first
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn find(&self, answer_id: i64) -> Option<&Answer> {
        self.answers.iter().find(|a| a.id == answer_id)
    }

    pub fn has_answered(&self, author: &str) -> bool {
        self.answers.iter().any(|a| a.author == author)
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Add `author`'s answer at the top of the thread
    pub fn submit_answer(&mut self, author: &str, content: &str) -> Result<&Answer, AnswerError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AnswerError::Empty);
        }
        if content.chars().count() > self.max_chars {
            return Err(AnswerError::TooLong {
                max: self.max_chars,
            });
        }
        if self.has_answered(author) {
            return Err(AnswerError::AlreadyAnswered);
        }

        let mut id = Utc::now().timestamp_millis();
        if let Some(newest) = self.answers.iter().map(|a| a.id).max() {
            id = id.max(newest.saturating_add(1));
        }

        self.answers.insert(
            0,
            Answer {
                id,
                author: author.to_string(),
                content: content.to_string(),
                time_label: "방금 전".into(),
                replies: Vec::new(),
            },
        );
        self.persist();
        debug!("{} answered today's question ({})", author, id);

        Ok(&self.answers[0])
    }

    /// Append a reply under an existing answer
    pub fn add_reply(
        &mut self,
        answer_id: i64,
        author: &str,
        content: &str,
    ) -> Result<&Reply, AnswerError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AnswerError::Empty);
        }

        let index = self
            .answers
            .iter()
            .position(|a| a.id == answer_id)
            .ok_or(AnswerError::AnswerNotFound(answer_id))?;

        let replies = &mut self.answers[index].replies;
        replies.push(Reply {
            author: author.to_string(),
            content: content.to_string(),
        });
        let position = replies.len() - 1;
        self.persist();

        Ok(&self.answers[index].replies[position])
    }

    fn persist(&self) {
        self.store.write(&self.key, &AnswerList(self.answers.clone()));
    }
}
