//! File-backed session store.
//!
//! Same semantics as the in-memory store, but every mutation is written
//! through to a JSON file mapping user identity to the RFC 3339 start
//! timestamp, so open sessions survive a restart. There is no additional
//! logic over the in-memory variant.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use super::{SessionError, SessionStore};

/// Durable session store backed by a JSON file.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    sessions: Mutex<HashMap<String, String>>,
}

impl FileSessionStore {
    /// Opens the store, loading any previously persisted sessions.
    ///
    /// A missing file is treated as an empty store; it is created on the
    /// first mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();

        let sessions = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            HashMap::new()
        };

        debug!(
            "Loaded {} open session(s) from {}",
            sessions.len(),
            path.display()
        );

        Ok(Self {
            path,
            sessions: Mutex::new(sessions),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn save(&self, sessions: &HashMap<String, String>) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(sessions)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

fn parse_start(user: &str, raw: &str) -> Result<DateTime<FixedOffset>, SessionError> {
    DateTime::parse_from_rfc3339(raw).map_err(|source| SessionError::InvalidTimestamp {
        user: user.to_owned(),
        source,
    })
}

impl SessionStore for FileSessionStore {
    fn exists(&self, user: &str) -> Result<bool, SessionError> {
        Ok(self.lock().contains_key(user))
    }

    fn get(&self, user: &str) -> Result<Option<DateTime<FixedOffset>>, SessionError> {
        match self.lock().get(user) {
            Some(raw) => Ok(Some(parse_start(user, raw)?)),
            None => Ok(None),
        }
    }

    fn put(&self, user: &str, start: DateTime<FixedOffset>) -> Result<bool, SessionError> {
        let mut sessions = self.lock();
        match sessions.entry(user.to_owned()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(start.to_rfc3339());
                self.save(&sessions)?;
                Ok(true)
            }
        }
    }

    fn delete(&self, user: &str) -> Result<Option<DateTime<FixedOffset>>, SessionError> {
        let mut sessions = self.lock();
        match sessions.remove(user) {
            Some(raw) => {
                self.save(&sessions)?;
                Ok(Some(parse_start(user, &raw)?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "aircon_sessions_{tag}_{}_{nanos}.json",
            std::process::id()
        ))
    }

    fn ts() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 5, 9, 3, 0)
            .unwrap()
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let path = temp_path("missing");
        let store = FileSessionStore::open(&path).unwrap();
        assert!(!store.exists("alice").unwrap());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_sessions_survive_reopen() {
        let path = temp_path("reopen");

        let store = FileSessionStore::open(&path).unwrap();
        assert!(store.put("alice", ts()).unwrap());
        drop(store);

        let reopened = FileSessionStore::open(&path).unwrap();
        assert!(reopened.exists("alice").unwrap());
        assert_eq!(reopened.get("alice").unwrap(), Some(ts()));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_delete_is_persisted() {
        let path = temp_path("delete");

        let store = FileSessionStore::open(&path).unwrap();
        store.put("alice", ts()).unwrap();
        assert_eq!(store.delete("alice").unwrap(), Some(ts()));
        drop(store);

        let reopened = FileSessionStore::open(&path).unwrap();
        assert!(!reopened.exists("alice").unwrap());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_put_twice_keeps_first_start() {
        let path = temp_path("double_put");

        let store = FileSessionStore::open(&path).unwrap();
        assert!(store.put("alice", ts()).unwrap());
        let later = ts() + chrono::Duration::hours(1);
        assert!(!store.put("alice", later).unwrap());
        assert_eq!(store.get("alice").unwrap(), Some(ts()));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_timestamp_is_reported() {
        let path = temp_path("corrupt");
        std::fs::write(&path, r#"{"alice": "not-a-timestamp"}"#).unwrap();

        let store = FileSessionStore::open(&path).unwrap();
        assert!(store.exists("alice").unwrap());
        assert!(matches!(
            store.get("alice"),
            Err(SessionError::InvalidTimestamp { .. })
        ));

        let _ = std::fs::remove_file(&path);
    }
}
