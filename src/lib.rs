//! Bananas - desktop client localization core
//!
//! Provides the reactive translation store the UI reads its strings from:
//! the persisted language preference picks the starting locale, and the
//! store can be switched to another locale at runtime with every subscribed
//! view notified.

pub mod i18n;
pub mod observable;
pub mod storage;

// Re-export commonly used types
pub use i18n::{AppTranslationStore, Locale, Translation, TranslationStore};
pub use observable::{Subscription, Writable};
pub use storage::config::{AppConfig, TomlSettingsProvider};
