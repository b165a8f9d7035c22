//! Mock locale loader for store tests.
//!
//! Wraps the embedded catalog, records every load request and can hold a
//! load open until the test releases it.

use bananas::i18n::{FluentCatalog, I18nError, Locale, LocaleLoader, Translation, TranslationFactory};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Clone)]
pub struct RecordingLoader {
    catalog: FluentCatalog,
    loads: Arc<Mutex<Vec<String>>>,
    builds: Arc<Mutex<usize>>,
    gates: Arc<Mutex<HashMap<String, Arc<Notify>>>>,
}

impl RecordingLoader {
    pub fn new() -> Self {
        Self {
            catalog: FluentCatalog::embedded(),
            loads: Arc::new(Mutex::new(Vec::new())),
            builds: Arc::new(Mutex::new(0)),
            gates: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Hold loads of `tag` until the returned handle is notified.
    pub fn gate(&self, tag: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(tag.to_string(), Arc::clone(&notify));
        notify
    }

    /// Locale tags in the order loads were requested.
    pub fn loads(&self) -> Vec<String> {
        self.loads.lock().unwrap().clone()
    }

    pub fn has_started(&self, tag: &str) -> bool {
        self.loads.lock().unwrap().iter().any(|t| t == tag)
    }

    pub fn builds(&self) -> usize {
        *self.builds.lock().unwrap()
    }
}

impl LocaleLoader for RecordingLoader {
    async fn load_locale(&self, locale: &Locale) -> Result<(), I18nError> {
        self.loads.lock().unwrap().push(locale.code());

        let gate = self.gates.lock().unwrap().get(&locale.code()).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.catalog.load_locale(locale).await
    }
}

impl TranslationFactory for RecordingLoader {
    fn build(&self, locale: &Locale) -> Result<Translation, I18nError> {
        *self.builds.lock().unwrap() += 1;
        self.catalog.build(locale)
    }
}

/// Collect the locale of every translation a subscriber sees.
pub fn locale_recorder() -> (
    Arc<Mutex<Vec<String>>>,
    impl Fn(&Translation) + Send + Sync + 'static,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |t: &Translation| {
        sink.lock().unwrap().push(t.locale().code())
    })
}
