//! Local word-quiz session
//!
//! Picks are stored in the quiz selection ledger so every family member's
//! avatar shows on the option they chose. Checking the answer locks the
//! board until [`QuizBoard::reset`].

use crate::selection::SelectionLedger;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub label: String,
    pub correct: bool,
}

impl QuizOption {
    pub fn new(label: impl Into<String>, correct: bool) -> Self {
        Self {
            label: label.into(),
            correct,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("이미 정답을 확인했어요.")]
    Locked,

    #[error("먼저 보기 하나를 선택해 주세요.")]
    NoSelection,

    #[error("알 수 없는 보기입니다: {0}")]
    UnknownOption(String),
}

/// Outcome of checking the current pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizVerdict {
    pub option: String,
    pub correct: bool,
    /// Label of the correct option, for highlighting
    pub answer: Option<String>,
}

impl QuizVerdict {
    /// Result line shown under the quiz
    pub fn headline(&self) -> &'static str {
        if self.correct {
            "정답입니다! 🎉"
        } else {
            "아쉽지만 오답이에요. 😢"
        }
    }
}

#[derive(Debug)]
pub struct QuizBoard {
    ledger: SelectionLedger,
    options: Vec<QuizOption>,
    selection: Option<String>,
    locked: bool,
}

impl QuizBoard {
    pub fn new(ledger: SelectionLedger, options: Vec<QuizOption>) -> Self {
        Self {
            ledger,
            options,
            selection: None,
            locked: false,
        }
    }

    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn ledger(&self) -> &SelectionLedger {
        &self.ledger
    }

    /// Pick `option` for `voter_id`; ignored once the board is locked
    pub fn select(&mut self, option: &str, voter_id: &str) -> Result<(), QuizError> {
        if self.locked {
            return Err(QuizError::Locked);
        }
        if !self.options.iter().any(|o| o.label == option) {
            return Err(QuizError::UnknownOption(option.to_string()));
        }

        self.selection = Some(option.to_string());
        self.ledger.record_selection(option, voter_id);
        Ok(())
    }

    /// Grade the current pick and lock the board
    pub fn check(&mut self) -> Result<QuizVerdict, QuizError> {
        if self.locked {
            return Err(QuizError::Locked);
        }
        let option = self.selection.clone().ok_or(QuizError::NoSelection)?;

        let correct = self
            .options
            .iter()
            .any(|o| o.label == option && o.correct);
        let answer = self
            .options
            .iter()
            .find(|o| o.correct)
            .map(|o| o.label.clone());

        self.locked = true;
        Ok(QuizVerdict {
            option,
            correct,
            answer,
        })
    }

    /// Forget the local pick and unlock; the ledger keeps stored picks
    pub fn reset(&mut self) {
        self.selection = None;
        self.locked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyedStore;

    fn board() -> QuizBoard {
        QuizBoard::new(
            SelectionLedger::new(KeyedStore::in_memory(), "quiz"),
            vec![
                QuizOption::new("킹받네", true),
                QuizOption::new("어쩔티비", false),
            ],
        )
    }

    #[test]
    fn test_check_requires_selection() {
        let mut board = board();
        assert_eq!(board.check().unwrap_err(), QuizError::NoSelection);
        assert!(!board.is_locked());
    }

    #[test]
    fn test_wrong_pick_then_locked() {
        let mut board = board();
        board.select("킹받네", "user1").unwrap();
        board.select("어쩔티비", "user1").unwrap();

        let verdict = board.check().unwrap();
        assert!(!verdict.correct);
        assert_eq!(verdict.answer.as_deref(), Some("킹받네"));
        assert_eq!(verdict.headline(), "아쉽지만 오답이에요. 😢");

        assert_eq!(board.select("킹받네", "user1").unwrap_err(), QuizError::Locked);
        assert_eq!(board.ledger().list_voters("어쩔티비"), vec!["user1"]);
        assert!(board.ledger().list_voters("킹받네").is_empty());
    }

    #[test]
    fn test_reset_unlocks() {
        let mut board = board();
        board.select("킹받네", "user1").unwrap();
        assert!(board.check().unwrap().correct);

        board.reset();
        assert!(!board.is_locked());
        assert_eq!(board.selection(), None);
        assert_eq!(board.ledger().choice_of("user1").as_deref(), Some("킹받네"));
    }

    #[test]
    fn test_unknown_option() {
        let mut board = board();
        assert!(matches!(board.select("없는 보기", "user1"), Err(QuizError::UnknownOption(_))));
    }
}
