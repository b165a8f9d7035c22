//! Observable store holding the current translation.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::loader::{FluentCatalog, LocaleLoader, TranslationFactory};
use super::locale::Locale;
use super::settings::{resolve_locale, SettingsProvider};
use super::translation::Translation;
use super::I18nError;
use crate::observable::{Subscription, Writable};

/// The store the desktop application runs with.
pub type AppTranslationStore = TranslationStore<FluentCatalog, FluentCatalog>;

/// Outcome of [`TranslationStore::set_locale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleChange {
    /// The new translation was published to subscribers.
    Published,
    /// A later call overtook this one before it published.
    Superseded,
}

/// Holds the current [`Translation`] and publishes locale changes.
///
/// Views read strings through [`TranslationStore::subscribe`]. The store is
/// created once at startup and shared behind an `Arc`; locale changes are
/// started through that `Arc`.
pub struct TranslationStore<L, F> {
    loader: L,
    factory: F,
    value: Writable<Translation>,
    /// Ticket of the most recent `set_locale` call.
    requested: AtomicU64,
    in_flight: tokio::sync::Mutex<()>,
}

impl<L, F> TranslationStore<L, F>
where
    L: LocaleLoader + 'static,
    F: TranslationFactory + 'static,
{
    /// Create a store for the persisted language preference.
    ///
    /// Missing or unusable settings fall back to the default locale. Errors
    /// from the loader or factory are returned as is.
    pub async fn create<S>(settings: &S, loader: L, factory: F) -> Result<Self, I18nError>
    where
        S: SettingsProvider,
    {
        let settings = settings.get_settings().await;
        let locale = resolve_locale(settings.as_ref());

        loader.load_locale(&locale).await?;
        let initial = factory.build(&locale)?;

        tracing::info!(locale = %locale, "Translation store ready");

        Ok(Self {
            loader,
            factory,
            value: Writable::new(initial),
            requested: AtomicU64::new(0),
            in_flight: tokio::sync::Mutex::new(()),
        })
    }

    /// Subscribe to translation changes.
    ///
    /// `callback` runs immediately with the current translation and then once
    /// for every published locale change, in call order.
    pub fn subscribe<C>(&self, callback: C) -> Subscription
    where
        C: Fn(&Translation) + Send + Sync + 'static,
    {
        self.value.subscribe(callback)
    }

    /// Get the current translation.
    pub fn current(&self) -> Translation {
        self.value.get()
    }

    /// Get the current locale.
    pub fn locale(&self) -> Locale {
        self.value.get().locale().clone()
    }

    /// Switch to `locale`.
    ///
    /// The caller must pass a supported locale; the loader is what rejects
    /// anything else, and its error is returned with the current translation
    /// left in place.
    ///
    /// Changes run one at a time in the order this method is called, which is
    /// fixed before the returned future is first polled, so it may be handed
    /// to `tokio::spawn`. A change overtaken by a later call before
    /// publishing resolves to [`LocaleChange::Superseded`] and publishes
    /// nothing, so the last call wins.
    pub fn set_locale(
        self: &Arc<Self>,
        locale: Locale,
    ) -> impl Future<Output = Result<LocaleChange, I18nError>> + Send + 'static {
        let ticket = self.requested.fetch_add(1, Ordering::SeqCst) + 1;
        let store = Arc::clone(self);

        async move {
            let _guard = store.in_flight.lock().await;
            if store.is_superseded(ticket) {
                tracing::debug!(locale = %locale, "Locale change superseded before loading");
                return Ok(LocaleChange::Superseded);
            }

            store.loader.load_locale(&locale).await?;
            if store.is_superseded(ticket) {
                tracing::debug!(locale = %locale, "Locale change superseded after loading");
                return Ok(LocaleChange::Superseded);
            }

            let translation = store.factory.build(&locale)?;
            store.value.set(translation);

            tracing::info!(locale = %locale, "Locale changed");
            Ok(LocaleChange::Published)
        }
    }

    fn is_superseded(&self, ticket: u64) -> bool {
        self.requested.load(Ordering::SeqCst) != ticket
    }
}

/// Create the application's store over a Fluent catalog.
pub async fn create_translation_store<S>(
    settings: &S,
    catalog: FluentCatalog,
) -> Result<AppTranslationStore, I18nError>
where
    S: SettingsProvider,
{
    TranslationStore::create(settings, catalog.clone(), catalog).await
}
