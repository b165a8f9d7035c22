//! Subscribable value holder.
//!
//! `Writable` keeps one current value and pushes every replacement to the
//! callbacks registered through [`Writable::subscribe`]. Subscribers get the
//! current value immediately, then one call per [`Writable::set`], with no
//! batching and no equality check.

use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use std::thread::{self, ThreadId};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: RwLock<T>,
    subscribers: Mutex<Vec<(u64, Callback<T>)>>,
    next_id: Mutex<u64>,
    /// Held while a `set` or a subscribe replay is delivering.
    delivery: Mutex<()>,
    /// Thread currently holding `delivery`.
    delivering: Mutex<Option<ThreadId>>,
}

impl<T> Inner<T> {
    fn remove(&self, id: u64) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(sub_id, _)| *sub_id != id);
    }

    /// Run `deliver` with deliveries serialized across threads.
    ///
    /// A callback that calls back into the writable is already on the
    /// delivering thread and runs straight through.
    fn serialized<R>(&self, deliver: impl FnOnce() -> R) -> R {
        let current = thread::current().id();
        let reentrant =
            *self.delivering.lock().unwrap_or_else(PoisonError::into_inner) == Some(current);
        if reentrant {
            return deliver();
        }

        let _delivery = self.delivery.lock().unwrap_or_else(PoisonError::into_inner);
        *self.delivering.lock().unwrap_or_else(PoisonError::into_inner) = Some(current);
        let _reset = DeliveringReset(&self.delivering);
        deliver()
    }
}

struct DeliveringReset<'a>(&'a Mutex<Option<ThreadId>>);

impl Drop for DeliveringReset<'_> {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// A value container with subscription-based change notification.
///
/// Deliveries are serialized: a subscriber never sees its replay after a
/// newer value, and never sees one value twice. Callbacks run without the
/// value or subscriber locks held, so from inside a callback it is fine to
/// read, subscribe or drop a [`Subscription`].
pub struct Writable<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Writable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new writable holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(value),
                subscribers: Mutex::new(Vec::new()),
                next_id: Mutex::new(0),
                delivery: Mutex::new(()),
                delivering: Mutex::new(None),
            }),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.inner
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the current value and notify every subscriber.
    pub fn set(&self, value: T) {
        self.inner.serialized(|| {
            *self
                .inner
                .value
                .write()
                .unwrap_or_else(PoisonError::into_inner) = value.clone();

            let callbacks: Vec<Callback<T>> = self
                .inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .map(|(_, callback)| Arc::clone(callback))
                .collect();

            for callback in callbacks {
                callback(&value);
            }
        });
    }

    /// Register `callback`, invoking it right away with the current value.
    ///
    /// The callback stays registered until the returned [`Subscription`] is
    /// dropped or explicitly unsubscribed.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Callback<T> = Arc::new(callback);

        let id = {
            let mut next_id = self
                .inner
                .next_id
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *next_id += 1;
            *next_id
        };

        self.inner.serialized(|| {
            self.inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((id, Arc::clone(&callback)));

            callback(&self.get());
        });

        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.remove(id);
                }
            })),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Handle returned by [`Writable::subscribe`].
///
/// Dropping it detaches the callback.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Detach the callback now.
    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
