//! Locale-bound translation lookups.

use std::fmt;
use std::sync::Arc;

use fluent::concurrent::FluentBundle;
use fluent::{FluentArgs, FluentResource};

use super::locale::Locale;

pub(crate) type Bundle = FluentBundle<Arc<FluentResource>>;

/// Immutable translations for one locale.
///
/// Cloning is cheap; clones share the same bundle.
#[derive(Clone)]
pub struct Translation {
    locale: Locale,
    bundle: Arc<Bundle>,
}

impl Translation {
    pub(crate) fn new(locale: Locale, bundle: Bundle) -> Self {
        Self {
            locale,
            bundle: Arc::new(bundle),
        }
    }

    /// The locale these translations are for.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Translate a message by key.
    ///
    /// Unknown keys come back unchanged.
    pub fn get(&self, key: &str) -> String {
        self.format(key, None)
    }

    /// Translate a message with arguments.
    pub fn get_with_args(&self, key: &str, args: &FluentArgs) -> String {
        self.format(key, Some(args))
    }

    /// Check if a message exists for `key`.
    pub fn has_key(&self, key: &str) -> bool {
        self.bundle.has_message(key)
    }

    /// Whether two handles come from the same build.
    pub fn ptr_eq(a: &Translation, b: &Translation) -> bool {
        Arc::ptr_eq(&a.bundle, &b.bundle)
    }

    fn format(&self, key: &str, args: Option<&FluentArgs>) -> String {
        let Some(pattern) = self.bundle.get_message(key).and_then(|msg| msg.value()) else {
            tracing::debug!(locale = %self.locale, "Missing translation key: {}", key);
            return key.to_string();
        };

        let mut errors = vec![];
        let value = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            tracing::debug!(locale = %self.locale, "Errors formatting {}: {:?}", key, errors);
        }
        value.into_owned()
    }
}

impl fmt::Debug for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translation")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}
