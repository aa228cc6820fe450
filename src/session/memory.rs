use super::{SessionError, SessionStore};
use std::{collections::HashMap, sync::RwLock};

/// Process-local store, lost on exit.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> SessionError {
    SessionError::Unavailable("session lock poisoned".to_string())
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut items = self.items.write().map_err(poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        let mut items = self.items.write().map_err(poisoned)?;
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_and_remove_clears() -> Result<(), SessionError> {
        let store = MemorySessionStore::new();
        assert_eq!(store.get_item("k")?, None);

        store.set_item("k", "one")?;
        store.set_item("k", "two")?;
        assert_eq!(store.get_item("k")?, Some("two".to_string()));

        store.remove_item("k")?;
        store.remove_item("k")?;
        assert_eq!(store.get_item("k")?, None);
        Ok(())
    }
}
