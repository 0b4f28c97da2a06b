//! Last-viewed catalog query, remembered across restarts.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The query to restore when the catalog view reopens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastQuery {
    pub dataset_id: String,
    pub viewed_at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    StorageUnavailable,
    Corrupt(String),
    Io(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::StorageUnavailable => write!(f, "session storage unavailable"),
            SessionError::Corrupt(msg) => write!(f, "session storage corrupt: {msg}"),
            SessionError::Io(msg) => write!(f, "session storage error: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {}

pub trait SessionStore {
    fn load(&self) -> Result<Option<LastQuery>, SessionError>;
    fn save(&mut self, query: &LastQuery) -> Result<(), SessionError>;
    fn clear(&mut self) -> Result<(), SessionError>;
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    current: Option<LastQuery>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> Result<Option<LastQuery>, SessionError> {
        Ok(self.current.clone())
    }

    fn save(&mut self, query: &LastQuery) -> Result<(), SessionError> {
        self.current = Some(query.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.current = None;
        Ok(())
    }
}

/// JSON file store with atomic writes (temp file + rename).
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<LastQuery>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::Io(e.to_string())),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| SessionError::Corrupt(e.to_string()))
    }

    fn save(&mut self, query: &LastQuery) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::Io(e.to_string()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(query).map_err(|e| SessionError::Io(e.to_string()))?;
        std::fs::write(&tmp, text).map_err(|e| SessionError::Io(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| SessionError::Io(e.to_string()))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn query() -> LastQuery {
        LastQuery {
            dataset_id: "5218f0ef".to_string(),
            viewed_at_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn in_memory_round_trip() {
        let mut store = InMemorySessionStore::new();
        assert_eq!(store.load().expect("load"), None);

        store.save(&query()).expect("save");
        assert_eq!(store.load().expect("load"), Some(query()));

        store.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");

        let mut store = FileSessionStore::new(&path);
        assert_eq!(store.load().expect("load"), None);
        store.save(&query()).expect("save");

        // Reopen: the record must still be there.
        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.load().expect("load"), Some(query()));
    }

    #[test]
    fn corrupt_file_is_reported_not_swallowed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").expect("write");

        let store = FileSessionStore::new(&path);
        assert!(matches!(store.load(), Err(SessionError::Corrupt(_))));
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileSessionStore::new(dir.path().join("session.json"));
        store.clear().expect("first clear");
        store.clear().expect("second clear");
    }
}
