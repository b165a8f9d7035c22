//! Bananas - desktop client
//!
//! Main entry point for the application.

use std::sync::Arc;

use anyhow::Context;
use bananas::i18n::{create_translation_store, FluentCatalog};
use bananas::storage::config::TomlSettingsProvider;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Bananas v{}", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    let settings = TomlSettingsProvider::from_default_location();
    let config_path = settings.path().to_path_buf();
    let store = runtime
        .block_on(create_translation_store(&settings, FluentCatalog::embedded()))
        .context("failed to load translations")?;
    let store = Arc::new(store);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 420.0])
            .with_min_inner_size([400.0, 300.0])
            .with_title("Bananas"),
        ..Default::default()
    };

    let handle = runtime.handle().clone();
    eframe::run_native(
        "Bananas",
        options,
        Box::new(move |cc| Ok(Box::new(app::BananasApp::new(cc, store, handle, config_path)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))
}
