//! Internationalization module for runtime language switching.
//!
//! The UI reads localized strings from a [`TranslationStore`]: an observable
//! holder of the current [`Translation`] that is created once at startup from
//! the persisted language preference and can be re-pointed to another locale
//! while the application runs.
//!
//! The store only composes collaborators:
//!
//! - [`SettingsProvider`] supplies the persisted language preference
//! - [`LocaleLoader`] makes a locale's translation data resident
//! - [`TranslationFactory`] builds a [`Translation`] for a resident locale
//!
//! [`FluentCatalog`] is the default loader and factory, backed by Fluent
//! `.ftl` files either compiled into the binary or read from a directory.

pub mod loader;
pub mod locale;
pub mod settings;
pub mod store;
pub mod translation;

pub use loader::{CatalogSource, FluentCatalog, LocaleLoader, TranslationFactory};
pub use locale::{Locale, DEFAULT_LOCALE, SUPPORTED_LOCALES};
pub use settings::{resolve_locale, Settings, SettingsProvider};
pub use store::{create_translation_store, AppTranslationStore, LocaleChange, TranslationStore};
pub use translation::Translation;

// Arguments for `Translation::get_with_args`.
pub use fluent::FluentArgs;

/// Errors produced while loading locales or building translations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum I18nError {
    #[error("Locale not found: {0}")]
    LocaleNotFound(String),

    #[error("Locale not loaded: {0}")]
    LocaleNotLoaded(String),

    #[error("Failed to load translations: {0}")]
    LoadFailed(String),

    #[error("Invalid translation file: {0}")]
    ParseError(String),

    #[error("Invalid locale identifier: {0}")]
    InvalidLocale(String),
}
