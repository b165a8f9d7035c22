//! Integration tests for the translation store.
//!
//! Covers initial locale resolution, notification order, current-value
//! replay for late subscribers, error propagation and last-call-wins when
//! locale changes overlap.

use super::collaborator_mock::{locale_recorder, RecordingLoader};
use bananas::i18n::{I18nError, Locale, LocaleChange, Settings, Translation, TranslationStore};
use std::sync::{Arc, Mutex};

fn locale(tag: &str) -> Locale {
    Locale::parse(tag).unwrap()
}

async fn create(
    settings: Option<Settings>,
) -> (Arc<TranslationStore<RecordingLoader, RecordingLoader>>, RecordingLoader) {
    let loader = RecordingLoader::new();
    let store = TranslationStore::create(&settings, loader.clone(), loader.clone())
        .await
        .unwrap();
    (Arc::new(store), loader)
}

#[tokio::test]
async fn test_initial_value_for_each_supported_language() {
    for tag in ["en", "fr", "de", "es", "it"] {
        let (store, loader) = create(Some(Settings::with_language(tag))).await;
        assert_eq!(store.locale(), locale(tag));
        assert_eq!(loader.loads(), vec![tag.to_string()]);
        assert_eq!(loader.builds(), 1);
    }
}

#[tokio::test]
async fn test_french_settings_start_in_french() {
    let (store, _) = create(Some(Settings::with_language("fr"))).await;
    assert_eq!(store.current().get("status-ready"), "Prêt");
}

#[tokio::test]
async fn test_missing_settings_start_in_english() {
    let (store, loader) = create(None).await;
    assert_eq!(store.locale(), locale("en"));
    assert_eq!(store.current().get("status-ready"), "Ready");
    assert_eq!(loader.loads(), vec!["en".to_string()]);
}

#[tokio::test]
async fn test_subscribe_receives_value_synchronously() {
    let (store, _) = create(None).await;
    let (seen, callback) = locale_recorder();

    let _sub = store.subscribe(callback);

    assert_eq!(*seen.lock().unwrap(), vec!["en"]);
}

#[tokio::test]
async fn test_sequential_changes_notify_in_order() {
    let (store, _) = create(None).await;
    let (seen, callback) = locale_recorder();
    let _sub = store.subscribe(callback);

    for tag in ["fr", "de", "es", "it", "en"] {
        store.set_locale(locale(tag)).await.unwrap();
    }

    assert_eq!(*seen.lock().unwrap(), vec!["en", "fr", "de", "es", "it", "en"]);
}

#[tokio::test]
async fn test_every_subscriber_sees_german_once() {
    let (store, _) = create(None).await;
    let (first_seen, first) = locale_recorder();
    let (second_seen, second) = locale_recorder();
    let _first = store.subscribe(first);
    let _second = store.subscribe(second);

    let change = store.set_locale(locale("de")).await;

    assert_eq!(change, Ok(LocaleChange::Published));
    assert_eq!(*first_seen.lock().unwrap(), vec!["en", "de"]);
    assert_eq!(*second_seen.lock().unwrap(), vec!["en", "de"]);
    assert_eq!(store.current().get("settings-heading"), "Einstellungen");
}

#[tokio::test]
async fn test_late_subscriber_gets_latest_value() {
    let (store, _) = create(None).await;
    store.set_locale(locale("fr")).await.unwrap();
    store.set_locale(locale("es")).await.unwrap();

    let (seen, callback) = locale_recorder();
    let _sub = store.subscribe(callback);

    assert_eq!(*seen.lock().unwrap(), vec!["es"]);
}

#[tokio::test]
async fn test_same_locale_twice_notifies_twice() {
    let (store, loader) = create(None).await;
    let received: Arc<Mutex<Vec<Translation>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let _sub = store.subscribe(move |t| sink.lock().unwrap().push(t.clone()));

    store.set_locale(locale("it")).await.unwrap();
    store.set_locale(locale("it")).await.unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 3);
    assert_eq!(received[1].locale(), received[2].locale());
    assert!(!Translation::ptr_eq(&received[1], &received[2]));
    assert_eq!(loader.builds(), 3);
}

#[tokio::test]
async fn test_unsubscribed_callback_is_not_called() {
    let (store, _) = create(None).await;
    let (seen, callback) = locale_recorder();
    let sub = store.subscribe(callback);

    sub.unsubscribe();
    store.set_locale(locale("fr")).await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["en"]);
}

#[tokio::test]
async fn test_loader_error_propagates() {
    let (store, _) = create(None).await;
    let (seen, callback) = locale_recorder();
    let _sub = store.subscribe(callback);

    let result = store.set_locale(locale("pt")).await;

    assert_eq!(result, Err(I18nError::LocaleNotFound("pt".to_string())));
    assert_eq!(store.locale(), locale("en"));
    assert_eq!(*seen.lock().unwrap(), vec!["en"]);
}

#[tokio::test]
async fn test_overlapping_changes_last_call_wins() {
    let (store, loader) = create(None).await;
    let (seen, callback) = locale_recorder();
    let _sub = store.subscribe(callback);

    let gate = loader.gate("de");
    let first = tokio::spawn(store.set_locale(locale("de")));

    while !loader.has_started("de") {
        tokio::task::yield_now().await;
    }

    let second = store.set_locale(locale("fr"));
    let third = store.set_locale(locale("it"));
    gate.notify_one();

    assert_eq!(first.await.unwrap(), Ok(LocaleChange::Superseded));
    assert_eq!(second.await, Ok(LocaleChange::Superseded));
    assert_eq!(third.await, Ok(LocaleChange::Published));

    // "fr" was overtaken while queued and never loaded; "de" finished loading
    // after being overtaken and was not published.
    assert_eq!(loader.loads(), vec!["en", "de", "it"]);
    assert_eq!(*seen.lock().unwrap(), vec!["en", "it"]);
    assert_eq!(store.locale(), locale("it"));
}

#[tokio::test]
async fn test_spawned_picks_only_last_is_published() {
    let (store, loader) = create(None).await;
    let (seen, callback) = locale_recorder();
    let _sub = store.subscribe(callback);

    // Same shape as the language picker: each pick is spawned right away.
    let gate = loader.gate("de");
    let first = tokio::spawn(store.set_locale(locale("de")));
    let second = tokio::spawn(store.set_locale(locale("fr")));
    gate.notify_one();

    let first = first.await.unwrap();
    let second = second.await.unwrap();

    assert_eq!(first, Ok(LocaleChange::Superseded));
    assert_eq!(second, Ok(LocaleChange::Published));
    assert_eq!(store.locale(), locale("fr"));
    assert_eq!(*seen.lock().unwrap(), vec!["en", "fr"]);
}
