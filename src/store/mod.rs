//! Parse-safe document store over a per-origin key-value backend
//!
//! Every caller must survive a cleared or corrupted store (private browsing,
//! quota errors), so reads fall back to the document's empty default and
//! writes log failures instead of returning them.
//!
//! Documents are written in a versioned envelope:
//!
//! ```json
//! {"schema": 1, "data": [ ... ]}
//! ```
//!
//! Bare documents without an envelope are still accepted when they parse as
//! the expected shape, so stores written by older front ends keep working.

mod file;
mod memory;
#[cfg(feature = "wasm")]
mod web;

pub use file::FileBackend;
pub use memory::MemoryBackend;
#[cfg(feature = "wasm")]
pub use web::LocalStorageBackend;

use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::rc::Rc;
use tracing::{debug, error, warn};

/// Raw string key-value storage, shaped like the browser's `Storage` API
pub trait KeyValueBackend {
    /// Read the raw value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; deleting a missing key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// A JSON document persisted under a single key
///
/// `SCHEMA` is bumped whenever the stored shape changes incompatibly; stored
/// documents carrying another schema number are discarded on read.
pub trait Document: Serialize + DeserializeOwned + Default {
    const SCHEMA: u32 = 1;
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    schema: u32,
    data: &'a T,
}

/// Shared handle to the document store
///
/// Cloning is cheap; all clones see the same backend.
#[derive(Clone)]
pub struct KeyedStore {
    backend: Rc<dyn KeyValueBackend>,
}

impl KeyedStore {
    pub fn new(backend: impl KeyValueBackend + 'static) -> Self {
        Self {
            backend: Rc::new(backend),
        }
    }

    /// Store backed by process memory
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Read the document at `key`, or its default when missing or unreadable
    pub fn read<T: Document>(&self, key: &str) -> T {
        let raw = match self.backend.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                return T::default();
            }
        };

        decode(key, &raw).unwrap_or_default()
    }

    /// Persist `document` at `key`
    ///
    /// Failures are logged and swallowed.
    pub fn write<T: Document>(&self, key: &str, document: &T) {
        let envelope = Envelope {
            schema: T::SCHEMA,
            data: document,
        };

        let raw = match serde_json::to_string(&envelope) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to serialize {}: {}", key, e);
                return;
            }
        };

        match self.backend.set_item(key, &raw) {
            Ok(()) => debug!("Persisted {} ({} bytes)", key, raw.len()),
            Err(e) => error!("Failed to persist {}: {}", key, e),
        }
    }

    /// Delete the document at `key`; failures are logged and swallowed
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove_item(key) {
            error!("Failed to remove {}: {}", key, e);
        }
    }

    /// Raw stored string, for diagnostics
    pub fn raw(&self, key: &str) -> Option<String> {
        self.backend.get_item(key).ok().flatten()
    }
}

impl std::fmt::Debug for KeyedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedStore").finish_non_exhaustive()
    }
}

fn decode<T: Document>(key: &str, raw: &str) -> Option<T> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Discarding corrupt document {}: {}", key, e);
            return None;
        }
    };

    let data = match value {
        Value::Object(mut map) if is_envelope(&map) => {
            let schema = map.get("schema").and_then(Value::as_u64);
            if schema != Some(u64::from(T::SCHEMA)) {
                warn!(
                    "Discarding {}: schema {:?}, expected {}",
                    key,
                    schema,
                    T::SCHEMA
                );
                return None;
            }
            map.remove("data").unwrap_or(Value::Null)
        }
        legacy => legacy,
    };

    match serde_json::from_value(data) {
        Ok(document) => Some(document),
        Err(e) => {
            warn!("Discarding malformed document {}: {}", key, e);
            None
        }
    }
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    map.len() == 2 && map.get("schema").is_some_and(Value::is_u64) && map.contains_key("data")
}
