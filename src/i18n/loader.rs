//! Translation loading.
//!
//! [`LocaleLoader`] and [`TranslationFactory`] are the two halves the store
//! needs: one makes a locale's data resident, the other turns resident data
//! into a [`Translation`]. [`FluentCatalog`] implements both over `.ftl`
//! files.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use fluent::FluentResource;

use super::locale::Locale;
use super::translation::{Bundle, Translation};
use super::I18nError;

/// Makes a locale's translation data available to a [`TranslationFactory`].
pub trait LocaleLoader: Send + Sync {
    /// Load `locale`. Loading an already resident locale is a no-op.
    fn load_locale(&self, locale: &Locale) -> impl Future<Output = Result<(), I18nError>> + Send;
}

/// Builds translations for loaded locales.
pub trait TranslationFactory: Send + Sync {
    /// Build a fresh [`Translation`] for a locale that has been loaded.
    fn build(&self, locale: &Locale) -> Result<Translation, I18nError>;
}

/// Where a [`FluentCatalog`] reads its `.ftl` files from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Files compiled into the binary.
    Embedded,
    /// A directory containing one `<locale>.ftl` file per locale.
    Directory(PathBuf),
}

/// Fluent-backed loader and factory.
///
/// Clones share the set of resident locales, so one clone can load while
/// another builds.
#[derive(Clone)]
pub struct FluentCatalog {
    source: CatalogSource,
    resident: Arc<RwLock<HashMap<Locale, Arc<FluentResource>>>>,
}

impl FluentCatalog {
    /// Catalog over the translations compiled into the binary.
    pub fn embedded() -> Self {
        Self::with_source(CatalogSource::Embedded)
    }

    /// Catalog over `<dir>/<locale>.ftl` files.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::with_source(CatalogSource::Directory(dir.into()))
    }

    fn with_source(source: CatalogSource) -> Self {
        Self {
            source,
            resident: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Check whether `locale` has been loaded.
    pub fn is_loaded(&self, locale: &Locale) -> bool {
        self.resident
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(locale)
    }

    fn embedded_source(locale: &Locale) -> Option<&'static str> {
        match locale.code().as_str() {
            "en" => Some(include_str!("locales/en/main.ftl")),
            "fr" => Some(include_str!("locales/fr/main.ftl")),
            "de" => Some(include_str!("locales/de/main.ftl")),
            "es" => Some(include_str!("locales/es/main.ftl")),
            "it" => Some(include_str!("locales/it/main.ftl")),
            _ => None,
        }
    }

    async fn read_source(&self, locale: &Locale) -> Result<String, I18nError> {
        match &self.source {
            CatalogSource::Embedded => Self::embedded_source(locale)
                .map(str::to_owned)
                .ok_or_else(|| I18nError::LocaleNotFound(locale.code())),
            CatalogSource::Directory(dir) => {
                let path = dir.join(format!("{}.ftl", locale));
                let display = path.display().to_string();

                let read = tokio::task::spawn_blocking(move || std::fs::read_to_string(&path))
                    .await
                    .map_err(|e| I18nError::LoadFailed(e.to_string()))?;

                read.map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => I18nError::LocaleNotFound(locale.code()),
                    _ => I18nError::LoadFailed(format!("{}: {}", display, e)),
                })
            }
        }
    }
}

impl Default for FluentCatalog {
    fn default() -> Self {
        Self::embedded()
    }
}

impl std::fmt::Debug for FluentCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut loaded: Vec<String> = self
            .resident
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .map(Locale::code)
            .collect();
        loaded.sort();

        f.debug_struct("FluentCatalog")
            .field("source", &self.source)
            .field("loaded", &loaded)
            .finish()
    }
}

impl LocaleLoader for FluentCatalog {
    async fn load_locale(&self, locale: &Locale) -> Result<(), I18nError> {
        if self.is_loaded(locale) {
            return Ok(());
        }

        if !locale.is_supported() {
            return Err(I18nError::LocaleNotFound(locale.code()));
        }

        let source = self.read_source(locale).await?;
        let resource = FluentResource::try_new(source).map_err(|(_, errors)| {
            I18nError::ParseError(format!("{}: {} syntax error(s)", locale, errors.len()))
        })?;

        self.resident
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(locale.clone())
            .or_insert_with(|| Arc::new(resource));

        tracing::debug!(locale = %locale, "Loaded translations");
        Ok(())
    }
}

impl TranslationFactory for FluentCatalog {
    fn build(&self, locale: &Locale) -> Result<Translation, I18nError> {
        let resource = self
            .resident
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(locale)
            .cloned()
            .ok_or_else(|| I18nError::LocaleNotLoaded(locale.code()))?;

        let mut bundle = Bundle::new_concurrent(vec![locale.language_identifier().clone()]);
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|errors| {
            I18nError::ParseError(format!("{}: {} conflicting message(s)", locale, errors.len()))
        })?;

        Ok(Translation::new(locale.clone(), bundle))
    }
}
