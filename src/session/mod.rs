//! Local key-value session storage.
//!
//! The store holds string values under string keys, like browser local storage.
//! The last authenticated user lives under [`SESSION_KEY`] as a JSON string and
//! is replaced wholesale on every successful login or signup.

pub mod file;
pub mod memory;

pub use self::file::FileSessionStore;
pub use self::memory::MemorySessionStore;

use crate::auth::UserRecord;
use thiserror::Error;
use tracing::{debug, warn};

pub const SESSION_KEY: &str = "app_user";
pub const LOCALE_KEY: &str = "app_lang";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage unavailable: {0}")]
    Unavailable(String),
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub trait SessionStore: Send + Sync {
    /// # Errors
    /// Returns an error if the storage medium cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// # Errors
    /// Returns an error if the storage medium cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// # Errors
    /// Returns an error if the storage medium cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), SessionError>;

    /// Fire-and-forget write: a failure is logged and dropped, never returned.
    fn set_item_best_effort(&self, key: &str, value: &str) {
        if let Err(err) = self.set_item(key, value) {
            warn!("Session write for {} skipped: {}", key, err);
        }
    }
}

/// Persist `user` under [`SESSION_KEY`]. Best-effort.
pub fn remember_user(store: &dyn SessionStore, user: &UserRecord) {
    match serde_json::to_string(user) {
        Ok(value) => store.set_item_best_effort(SESSION_KEY, &value),
        Err(err) => warn!("Failed to serialize session user: {}", err),
    }
}

/// Last persisted user, if any. Unreadable or corrupt entries count as none.
#[must_use]
pub fn current_user(store: &dyn SessionStore) -> Option<UserRecord> {
    let value = match store.get_item(SESSION_KEY) {
        Ok(value) => value?,
        Err(err) => {
            warn!("Failed to read session: {}", err);

            return None;
        }
    };

    match serde_json::from_str::<UserRecord>(&value) {
        Ok(user) if !user.id.is_empty() => Some(user),
        Ok(_) => None,
        Err(err) => {
            warn!("Ignoring corrupt session entry: {}", err);

            None
        }
    }
}

/// Explicit session clear (logout).
///
/// # Errors
/// Returns an error if the entry cannot be removed.
pub fn clear(store: &dyn SessionStore) -> Result<(), SessionError> {
    debug!("Clearing session");

    store.remove_item(SESSION_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, SessionError> {
            Err(SessionError::Unavailable("disk gone".to_string()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), SessionError> {
            Err(SessionError::Unavailable("disk gone".to_string()))
        }

        fn remove_item(&self, _key: &str) -> Result<(), SessionError> {
            Err(SessionError::Unavailable("disk gone".to_string()))
        }
    }

    fn user(id: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: Some("+1 555 0100".to_string()),
            created_at: "2024-05-01T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn remember_then_read_back() {
        let store = MemorySessionStore::new();
        remember_user(&store, &user("u-1"));

        assert_eq!(current_user(&store), Some(user("u-1")));
        assert!(store
            .get_item(SESSION_KEY)
            .ok()
            .flatten()
            .is_some_and(|raw| raw.contains("\"id\":\"u-1\"")));
    }

    #[test]
    fn broken_store_is_absorbed() {
        remember_user(&BrokenStore, &user("u-1"));
        assert_eq!(current_user(&BrokenStore), None);
        assert!(clear(&BrokenStore).is_err());
    }

    #[test]
    fn corrupt_entry_reads_as_none() -> Result<(), SessionError> {
        let store = MemorySessionStore::new();
        store.set_item(SESSION_KEY, "{not json")?;
        assert_eq!(current_user(&store), None);

        store.set_item(SESSION_KEY, r#"{"id":""}"#)?;
        assert_eq!(current_user(&store), None);
        Ok(())
    }

    #[test]
    fn clear_removes_user() -> Result<(), SessionError> {
        let store = MemorySessionStore::new();
        remember_user(&store, &user("u-1"));
        clear(&store)?;
        assert_eq!(current_user(&store), None);
        Ok(())
    }
}
