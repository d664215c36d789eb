//! Per-option voter ledgers for the quiz and balance widgets
//!
//! A ledger maps an option label to the voters currently on it. A voter is
//! on at most one option: recording a selection first removes the voter
//! everywhere, then appends them to the chosen option.

use crate::config::StorageKeys;
use crate::store::{Document, KeyedStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Which ledger a selection belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// Word quiz; one answer per voter, locked once checked
    Quiz,
    /// Local balance pick; freely reassignable
    Balance,
}

impl SelectionKind {
    pub fn storage_key(self, keys: &StorageKeys) -> &str {
        match self {
            SelectionKind::Quiz => &keys.quiz_selections,
            SelectionKind::Balance => &keys.balance_selections,
        }
    }
}

/// Option label → ordered voter ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selections(BTreeMap<String, Vec<String>>);

impl Document for Selections {}

impl Selections {
    /// Voters on `option`, in selection order
    pub fn voters(&self, option: &str) -> &[String] {
        self.0.get(option).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The option `voter_id` is currently on
    pub fn choice_of(&self, voter_id: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, voters)| voters.iter().any(|v| v == voter_id))
            .map(|(option, _)| option.as_str())
    }

    /// Options that have at least one voter
    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn assign(&mut self, option: &str, voter_id: &str) {
        for voters in self.0.values_mut() {
            voters.retain(|v| v != voter_id);
        }
        self.0.retain(|_, voters| !voters.is_empty());

        let voters = self.0.entry(option.to_string()).or_default();
        if !voters.iter().any(|v| v == voter_id) {
            voters.push(voter_id.to_string());
        }
    }
}

/// Ledger persisted under one storage key
#[derive(Debug, Clone)]
pub struct SelectionLedger {
    store: KeyedStore,
    key: String,
}

impl SelectionLedger {
    pub fn new(store: KeyedStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Ledger for `kind` using the configured key
    pub fn for_kind(store: KeyedStore, kind: SelectionKind, keys: &StorageKeys) -> Self {
        Self::new(store, kind.storage_key(keys))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Move `voter_id` onto `option` and persist; returns the updated ledger
    pub fn record_selection(&self, option: &str, voter_id: &str) -> Selections {
        let mut selections = self.selections();
        selections.assign(option, voter_id);
        self.store.write(&self.key, &selections);
        debug!("{}: {} selected {:?}", self.key, voter_id, option);
        selections
    }

    /// Voters on `option`, empty if none
    pub fn list_voters(&self, option: &str) -> Vec<String> {
        self.selections().voters(option).to_vec()
    }

    /// The option `voter_id` is on, if any
    pub fn choice_of(&self, voter_id: &str) -> Option<String> {
        self.selections().choice_of(voter_id).map(str::to_string)
    }

    /// Current ledger contents
    pub fn selections(&self) -> Selections {
        self.store.read(&self.key)
    }
}
