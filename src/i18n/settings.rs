//! Persisted language preference and its resolution to a locale.

use std::future::Future;

use serde::{Deserialize, Serialize};

use super::locale::{Locale, DEFAULT_LOCALE};

/// The slice of persisted settings the translation store cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Preferred language tag, if the user picked one.
    #[serde(default)]
    pub language: Option<String>,
}

impl Settings {
    /// Settings with the given language preference.
    pub fn with_language(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
        }
    }
}

/// Source of persisted settings.
pub trait SettingsProvider: Send + Sync {
    /// Read the current settings.
    ///
    /// `None` means the settings could not be obtained at all.
    fn get_settings(&self) -> impl Future<Output = Option<Settings>> + Send;
}

/// Fixed settings, mostly useful for tests and headless tools.
impl SettingsProvider for Option<Settings> {
    async fn get_settings(&self) -> Option<Settings> {
        self.clone()
    }
}

/// Resolve the locale to start with.
///
/// Falls back to [`DEFAULT_LOCALE`] when the settings are missing, carry no
/// language, or carry one that is not a well-formed tag. A well-formed tag is
/// passed through even if it is not shipped; the loader rejects it later.
pub fn resolve_locale(settings: Option<&Settings>) -> Locale {
    let language = settings
        .and_then(|s| s.language.as_deref())
        .map(str::trim)
        .filter(|language| !language.is_empty());

    let Some(language) = language else {
        tracing::debug!("No language preference stored, using {}", DEFAULT_LOCALE);
        return Locale::default();
    };

    match Locale::parse(language) {
        Ok(locale) => locale,
        Err(e) => {
            tracing::debug!("Ignoring language preference: {}", e);
            Locale::default()
        }
    }
}
