use crate::{
    auth::{postgres::PgAuthService, rest::RestAuthService, Backend},
    session::{FileSessionStore, MemorySessionStore, SessionStore},
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::{fmt, path::PathBuf, sync::Arc};
use url::Url;

/// Where the procedures live and where the session is kept.
#[derive(Clone, Default)]
pub struct GlobalArgs {
    pub api_url: Option<String>,
    pub api_key: Option<SecretString>,
    pub dsn: Option<String>,
    pub session_path: Option<PathBuf>,
}

impl GlobalArgs {
    /// Build the transport. `--api-url` wins over `--dsn`.
    ///
    /// # Errors
    /// Returns an error if neither is set or the value is invalid.
    pub fn backend(&self) -> Result<Backend> {
        if let Some(url) = &self.api_url {
            return Ok(Backend::Rest(RestAuthService::new(
                url,
                self.api_key.clone(),
            )?));
        }

        if let Some(dsn) = &self.dsn {
            return Ok(Backend::Postgres(PgAuthService::connect_lazy(dsn)?));
        }

        Err(anyhow!("missing required argument: --api-url or --dsn"))
    }

    /// # Errors
    /// Returns an error if no session path is given and the platform has no
    /// local data directory.
    pub fn session_path(&self) -> Result<PathBuf> {
        match &self.session_path {
            Some(path) => Ok(path.clone()),
            None => FileSessionStore::default_path()
                .context("could not determine the session file location, use --session-path"),
        }
    }

    /// # Errors
    /// See [`GlobalArgs::session_path`].
    pub fn store(&self, ephemeral: bool) -> Result<Arc<dyn SessionStore>> {
        if ephemeral {
            return Ok(Arc::new(MemorySessionStore::new()));
        }

        Ok(Arc::new(FileSessionStore::new(self.session_path()?)))
    }
}

pub fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-dsn".to_string(),
    }
}

impl fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("dsn", &self.dsn.as_deref().map(redact_dsn))
            .field("session_path", &self.session_path)
            .finish()
    }
}
