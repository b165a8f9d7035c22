//! Main application state and egui integration.
//!
//! The window subscribes to the translation store and redraws whenever a new
//! translation is published. Picking a language switches the store on the
//! tokio runtime and writes the choice back to the configuration file.

use eframe::egui;

use bananas::i18n::{AppTranslationStore, FluentArgs, Locale, LocaleChange, Translation};
use bananas::observable::Subscription;
use bananas::storage::config::{load_config_from, save_config_to};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Main application state.
pub struct BananasApp {
    /// Shared translation store
    store: Arc<AppTranslationStore>,
    /// Runtime locale changes are spawned on
    runtime: tokio::runtime::Handle,
    /// Configuration file the language choice is saved to
    config_path: PathBuf,
    /// Latest published translation
    translation: Arc<Mutex<Translation>>,
    /// Locale shown in the language picker
    selected: Locale,
    /// Locale changes still in flight
    pending: Arc<AtomicUsize>,
    /// Serializes writes of the language preference
    persist_lock: Arc<tokio::sync::Mutex<()>>,
    /// Name used in the greeting
    user_name: String,
    _subscription: Subscription,
}

impl BananasApp {
    /// Create the application state.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        store: Arc<AppTranslationStore>,
        runtime: tokio::runtime::Handle,
        config_path: PathBuf,
    ) -> Self {
        match load_config_from(&config_path) {
            Ok(config) => cc.egui_ctx.set_zoom_factor(config.ui.font_scale),
            Err(e) => tracing::warn!("Using default UI settings: {}", e),
        }

        let translation = Arc::new(Mutex::new(store.current()));
        let sink = Arc::clone(&translation);
        let ctx = cc.egui_ctx.clone();
        let subscription = store.subscribe(move |t| {
            *sink.lock().unwrap_or_else(PoisonError::into_inner) = t.clone();
            ctx.request_repaint();
        });

        let user_name = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "Bananas".to_string());

        Self {
            selected: store.locale(),
            store,
            runtime,
            config_path,
            translation,
            pending: Arc::new(AtomicUsize::new(0)),
            persist_lock: Arc::new(tokio::sync::Mutex::new(())),
            user_name,
            _subscription: subscription,
        }
    }

    /// Switch the store to `locale` in the background.
    ///
    /// Only a published change is saved, and the saved value is whatever the
    /// store shows once the write lock is held.
    fn request_locale(&self, locale: Locale) {
        let store = Arc::clone(&self.store);
        let pending = Arc::clone(&self.pending);
        let persist_lock = Arc::clone(&self.persist_lock);
        let config_path = self.config_path.clone();

        pending.fetch_add(1, Ordering::SeqCst);
        let change = self.store.set_locale(locale.clone());
        self.runtime.spawn(async move {
            match change.await {
                Ok(LocaleChange::Published) => {
                    let _persist = persist_lock.lock().await;
                    let code = store.locale().code();
                    let saved =
                        tokio::task::spawn_blocking(move || persist_language(&config_path, code))
                            .await;
                    if let Err(e) = saved {
                        tracing::warn!("Saving language preference failed: {}", e);
                    }
                }
                Ok(LocaleChange::Superseded) => {
                    tracing::debug!("Not saving {}, a later pick replaced it", locale);
                }
                Err(e) => tracing::error!("Failed to switch language to {}: {}", locale, e),
            }
            pending.fetch_sub(1, Ordering::SeqCst);
        });
    }
}

fn persist_language(path: &Path, code: String) {
    let mut config = match load_config_from(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Not saving language preference: {}", e);
            return;
        }
    };

    config.language = Some(code);
    if let Err(e) = save_config_to(path, &config) {
        tracing::warn!("Not saving language preference: {}", e);
    }
}

impl eframe::App for BananasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let t = self
            .translation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let switching = self.pending.load(Ordering::SeqCst) > 0;

        // Follow the store once nothing is pending, which also undoes a failed pick.
        if !switching {
            self.selected = t.locale().clone();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(t.get("app-title"));

            let mut args = FluentArgs::new();
            args.set("name", self.user_name.as_str());
            ui.label(t.get_with_args("greeting", &args));

            ui.add_space(16.0);
            ui.separator();
            ui.heading(t.get("settings-heading"));

            let mut choice = self.selected.clone();
            egui::ComboBox::from_label(t.get("language-label"))
                .selected_text(choice.native_name())
                .show_ui(ui, |ui| {
                    for locale in Locale::supported() {
                        let name = locale.native_name();
                        ui.selectable_value(&mut choice, locale, name);
                    }
                });

            if choice != self.selected {
                self.selected = choice.clone();
                self.request_locale(choice);
            }

            ui.add_space(8.0);
            let status = if switching { "status-switching" } else { "status-ready" };
            ui.label(t.get(status));
        });
    }
}
