//! Language selector state. Three languages, each labeled in its own script.
//! The choice is kept in the session store under [`LOCALE_KEY`], best-effort.

use crate::session::{SessionStore, LOCALE_KEY};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};
use utoipa::ToSchema;

#[derive(ToSchema, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
    Zh,
}

impl Language {
    pub const ALL: [Self; 3] = [Self::En, Self::Ar, Self::Zh];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
            Self::Zh => "zh",
        }
    }

    /// Name of the language in its own script.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ar => "العربية",
            Self::Zh => "中文",
        }
    }

    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Ar)
    }

    /// Accepts codes and region-qualified tags, e.g. `ar`, `AR`, `zh-CN`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();

        Self::ALL
            .into_iter()
            .find(|language| language.code() == primary)
    }
}

#[derive(ToSchema, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    pub code: String,
    pub label: String,
    pub selected: bool,
}

/// Language-state provider.
pub struct LocaleState {
    current: RwLock<Language>,
    store: Arc<dyn SessionStore>,
}

impl LocaleState {
    /// Load the saved choice, defaulting to English.
    pub fn load(store: Arc<dyn SessionStore>) -> Self {
        let saved = match store.get_item(LOCALE_KEY) {
            Ok(value) => value.as_deref().and_then(Language::from_code),
            Err(err) => {
                warn!("Failed to read saved language: {}", err);

                None
            }
        };

        Self {
            current: RwLock::new(saved.unwrap_or_default()),
            store,
        }
    }

    #[must_use]
    pub fn current(&self) -> Language {
        self.current
            .read()
            .map(|language| *language)
            .unwrap_or_default()
    }

    pub fn select(&self, language: Language) {
        if let Ok(mut current) = self.current.write() {
            *current = language;
        }

        debug!("Language set to {}", language.code());

        self.store.set_item_best_effort(LOCALE_KEY, language.code());
    }

    #[must_use]
    pub fn options(&self) -> Vec<LanguageOption> {
        let current = self.current();

        Language::ALL
            .into_iter()
            .map(|language| LanguageOption {
                code: language.code().to_string(),
                label: language.label().to_string(),
                selected: language == current,
            })
            .collect()
    }
}
