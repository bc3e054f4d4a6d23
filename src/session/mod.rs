//! Usage session store module.
//!
//! A session is the open interval between a user's `/on` and their `/off`
//! (or `/abort`); its presence in the store is the sole source of truth for
//! "the timer is running". Two store variants exist: volatile in-memory and
//! file-backed.

mod file;
mod store;

pub use file::FileSessionStore;
pub use store::{InMemorySessionStore, SessionError, SessionStore};
