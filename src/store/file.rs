//! Directory-backed key-value backend for native hosts
//!
//! Each key is one `<key>.json` file. Writes go through a temporary file and
//! a rename so a crash never leaves a half-written document behind.

use super::KeyValueBackend;
use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key-value backend storing one file per key
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (and create if needed) a store directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Per-user data directory, e.g. `~/.local/share/dadam`
    #[cfg(feature = "native")]
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dadam")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`
    ///
    /// Characters outside `[A-Za-z0-9_-.]` and `%` itself are written as
    /// `%XX` per UTF-8 byte, so distinct keys never share a file.
    fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' => {
                    name.push(char::from(byte))
                }
                _ => name.push_str(&format!("%{:02X}", byte)),
            }
        }
        self.dir.join(format!("{}.json", name))
    }
}

impl KeyValueBackend for FileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path().join("store")).unwrap();

        assert_eq!(backend.get_item("dadam_answers_v1").unwrap(), None);
        backend.set_item("dadam_answers_v1", "[]").unwrap();
        assert_eq!(backend.get_item("dadam_answers_v1").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("store/dadam_answers_v1.json").exists());

        backend.remove_item("dadam_answers_v1").unwrap();
        backend.remove_item("dadam_answers_v1").unwrap();
        assert_eq!(backend.get_item("dadam_answers_v1").unwrap(), None);
    }

    #[test]
    fn test_keys_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        backend.set_item("../escape/key", "1").unwrap();
        assert!(dir.path().join("..%2Fescape%2Fkey.json").exists());
    }

    #[test]
    fn test_distinct_keys_never_collide() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        backend.set_item("a/b", "slash").unwrap();
        backend.set_item("a_b", "underscore").unwrap();
        backend.set_item("a%2Fb", "escaped").unwrap();

        assert_eq!(backend.get_item("a/b").unwrap().as_deref(), Some("slash"));
        assert_eq!(backend.get_item("a_b").unwrap().as_deref(), Some("underscore"));
        assert_eq!(backend.get_item("a%2Fb").unwrap().as_deref(), Some("escaped"));
    }
}
