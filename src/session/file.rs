//! JSON-file session store. The whole file is one object of string values and
//! is rewritten through a temporary file plus rename on every change.

use super::{SessionError, SessionStore};
use std::{
    collections::BTreeMap,
    ffi::OsString,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{debug, warn};
use ulid::Ulid;

#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `<local data dir>/vestibule/session.json`, when the platform has one.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("session.json"))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Map to start a write from. A corrupt file is replaced rather than kept.
    fn read_map_for_write(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match self.read_map() {
            Err(SessionError::Corrupt(err)) => {
                warn!("Replacing corrupt session file {}: {}", self.path.display(), err);

                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.tmp_path();
        let written = fs::write(&tmp, serde_json::to_vec_pretty(map)?)
            .and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(err) = written {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }

        debug!("Session file written: {}", self.path.display());

        Ok(())
    }

    /// Unique per write, so another process sharing the file never clobbers it.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("session"));
        name.push(format!(".{}.tmp", Ulid::new()));
        self.path.with_file_name(name)
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, ()>, SessionError> {
        self.lock
            .lock()
            .map_err(|_| SessionError::Unavailable("session lock poisoned".to_string()))
    }
}

impl SessionStore for FileSessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        let _guard = self.locked()?;
        Ok(self.read_map()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let _guard = self.locked()?;
        let mut map = self.read_map_for_write()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        let _guard = self.locked()?;
        let mut map = self.read_map_for_write()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}
