//! Listener registries and subscription handles

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

pub(crate) type Listener<T> = Arc<dyn Fn(T) + Send + Sync>;

struct ListenerMap<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

/// Ordered set of callbacks, notified in registration order.
pub(crate) struct Listeners<T> {
    inner: Arc<Mutex<ListenerMap<T>>>,
}

impl<T: Clone + 'static> Listeners<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ListenerMap {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub fn add(&self, listener: Listener<T>) -> Subscription {
        let id = {
            let mut map = self.inner.lock();
            let id = map.next_id;
            map.next_id += 1;
            map.entries.push((id, listener));
            id
        };

        let registry: Weak<Mutex<ListenerMap<T>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.lock().entries.retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// Call every listener with `value`.
    ///
    /// The registry lock is released before any callback runs, so a
    /// listener may subscribe or unsubscribe without deadlocking.
    pub fn notify(&self, value: T) {
        let snapshot: Vec<Listener<T>> = self
            .inner
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Clone for Listeners<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Handle for a registered listener.
///
/// The listener stays registered until [`unsubscribe`](Self::unsubscribe)
/// is called or the handle is dropped.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub(crate) fn new<F>(detach: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}
