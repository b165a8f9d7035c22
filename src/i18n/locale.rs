//! Locale identifiers.

use std::fmt;
use std::str::FromStr;

use unic_langid::LanguageIdentifier;

use super::I18nError;

/// Locale used when no usable preference is stored.
pub const DEFAULT_LOCALE: &str = "en";

/// Locales shipped with the application.
pub const SUPPORTED_LOCALES: &[&str] = &["en", "fr", "de", "es", "it"];

/// A locale tag such as `en` or `fr`.
///
/// Parsing only checks tag syntax. Whether the locale is actually shipped is
/// decided by the loader; see [`Locale::is_supported`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(LanguageIdentifier);

impl Locale {
    /// Parse a locale tag.
    pub fn parse(tag: &str) -> Result<Self, I18nError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(I18nError::InvalidLocale(String::new()));
        }

        tag.parse::<LanguageIdentifier>()
            .map(Self)
            .map_err(|e| I18nError::InvalidLocale(format!("{}: {}", tag, e)))
    }

    /// Get the canonical tag.
    pub fn code(&self) -> String {
        self.0.to_string()
    }

    /// Get the underlying language identifier.
    pub fn language_identifier(&self) -> &LanguageIdentifier {
        &self.0
    }

    /// Check whether this locale is in [`SUPPORTED_LOCALES`].
    pub fn is_supported(&self) -> bool {
        let code = self.code();
        SUPPORTED_LOCALES.contains(&code.as_str())
    }

    /// Get all supported locales.
    pub fn supported() -> Vec<Locale> {
        SUPPORTED_LOCALES
            .iter()
            .filter_map(|tag| Locale::parse(tag).ok())
            .collect()
    }

    /// Get the display name in the locale's own language.
    pub fn native_name(&self) -> &'static str {
        match self.0.language.as_str() {
            "en" => "English",
            "fr" => "Français",
            "de" => "Deutsch",
            "es" => "Español",
            "it" => "Italiano",
            _ => "Unknown",
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(DEFAULT_LOCALE.parse().unwrap_or_default())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
