//! Session store abstraction and the in-memory implementation.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, FixedOffset};

/// Errors from a session store backend.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to access the session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode the session file: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Stored start timestamp for '{user}' is not parseable: {source}")]
    InvalidTimestamp {
        user: String,
        source: chrono::ParseError,
    },
}

/// Mapping from user identity to the start timestamp of their open session.
///
/// Updates may be dispatched concurrently, so each mutating operation is
/// atomic: `put` checks and inserts under one lock, `delete` reads and
/// removes under one lock. This serializes session mutations per identity
/// without a separate per-key lock.
pub trait SessionStore: Send + Sync {
    /// Checks whether the user has an open session.
    fn exists(&self, user: &str) -> Result<bool, SessionError>;

    /// Returns the start timestamp of the user's open session, if any.
    fn get(&self, user: &str) -> Result<Option<DateTime<FixedOffset>>, SessionError>;

    /// Opens a session starting at `start`.
    ///
    /// Returns `false` and leaves the store untouched if the user already
    /// has an open session.
    fn put(&self, user: &str, start: DateTime<FixedOffset>) -> Result<bool, SessionError>;

    /// Closes the user's session, returning its start timestamp.
    ///
    /// Returns `None` if there was no open session.
    fn delete(&self, user: &str) -> Result<Option<DateTime<FixedOffset>>, SessionError>;
}

/// Volatile session store. Sessions are lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, DateTime<FixedOffset>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, DateTime<FixedOffset>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn exists(&self, user: &str) -> Result<bool, SessionError> {
        Ok(self.lock().contains_key(user))
    }

    fn get(&self, user: &str) -> Result<Option<DateTime<FixedOffset>>, SessionError> {
        Ok(self.lock().get(user).copied())
    }

    fn put(&self, user: &str, start: DateTime<FixedOffset>) -> Result<bool, SessionError> {
        match self.lock().entry(user.to_owned()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(start);
                Ok(true)
            }
        }
    }

    fn delete(&self, user: &str) -> Result<Option<DateTime<FixedOffset>>, SessionError> {
        Ok(self.lock().remove(user))
    }
}
