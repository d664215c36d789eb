//! In-process key-value backend

use super::KeyValueBackend;
use crate::error::{DadamError, Result};
use std::cell::RefCell;
use std::collections::HashMap;

/// Key-value backend held in memory
///
/// An optional quota (total bytes of keys plus values) mimics the browser's
/// `QuotaExceededError`.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: RefCell<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that rejects writes growing it past `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            items: RefCell::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.borrow_mut();

        if let Some(quota) = self.quota_bytes {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if used + key.len() + value.len() > quota {
                return Err(DadamError::Storage(format!(
                    "quota of {} bytes exceeded writing {}",
                    quota, key
                )));
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let backend = MemoryBackend::with_quota(10);
        backend.set_item("k", "12345").unwrap();
        backend.set_item("k", "123456789").unwrap();
        assert!(backend.set_item("k2", "1").is_err());
        assert_eq!(backend.len(), 1);
    }
}
