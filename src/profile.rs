//! Profile photos kept as data URIs per user

use crate::store::{Document, KeyedStore};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Default upload limit (5 MB)
pub const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// userId → data URI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileImageMap(pub BTreeMap<String, String>);

impl Document for ProfileImageMap {}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("이미지 파일만 업로드 가능합니다.")]
    NotAnImage,

    #[error("파일 크기는 5MB 이하여야 합니다.")]
    TooLarge { size: usize, max: usize },
}

/// Encode raw bytes as a `data:` URI
pub fn to_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[derive(Debug, Clone)]
pub struct ProfileImages {
    store: KeyedStore,
    key: String,
    max_bytes: usize,
}

impl ProfileImages {
    pub fn new(store: KeyedStore, key: impl Into<String>) -> Self {
        Self::with_limit(store, key, DEFAULT_MAX_BYTES)
    }

    pub fn with_limit(store: KeyedStore, key: impl Into<String>, max_bytes: usize) -> Self {
        Self {
            store,
            key: key.into(),
            max_bytes,
        }
    }

    /// Validate an uploaded file and store it as `user_id`'s photo
    ///
    /// Replaces any previous photo. Returns the stored data URI.
    pub fn upload(&self, user_id: &str, mime_type: &str, bytes: &[u8]) -> Result<String, ProfileError> {
        if !mime_type.starts_with("image/") {
            return Err(ProfileError::NotAnImage);
        }
        if bytes.len() > self.max_bytes {
            return Err(ProfileError::TooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }

        let uri = to_data_uri(mime_type, bytes);
        let mut images = self.all();
        images.0.insert(user_id.to_string(), uri.clone());
        self.store.write(&self.key, &images);
        debug!("Stored profile photo for {} ({} bytes)", user_id, bytes.len());

        Ok(uri)
    }

    pub fn get(&self, user_id: &str) -> Option<String> {
        self.all().0.remove(user_id)
    }

    pub fn all(&self) -> ProfileImageMap {
        self.store.read(&self.key)
    }
}
