//! Browser `localStorage` backend

use super::KeyValueBackend;
use crate::error::{DadamError, Result};
use wasm_bindgen::JsValue;

/// Key-value backend over the window's `localStorage`
pub struct LocalStorageBackend {
    storage: web_sys::Storage,
}

impl LocalStorageBackend {
    /// Bind to `window.localStorage`
    ///
    /// Fails when there is no window or storage is disabled (some private
    /// browsing modes).
    pub fn from_window() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| DadamError::Storage("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| DadamError::Storage("localStorage unavailable".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueBackend for LocalStorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_error)
    }
}

fn js_error(value: JsValue) -> DadamError {
    DadamError::Storage(format!("{:?}", value))
}
