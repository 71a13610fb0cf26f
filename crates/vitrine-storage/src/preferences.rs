//! Preference access with in-memory fallback
//!
//! [`Preferences`] fronts an optional durable [`PreferenceStore`]. Every
//! write lands in an in-memory mirror first, so when the durable store is
//! absent or fails the session keeps working from memory. The first failure
//! is logged and the wrapper stays memory-only until it is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::StorageError;
use crate::memory::MemoryStore;
use crate::Result;

/// A key-value store for site preferences.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct Preferences {
    durable: Option<Arc<dyn PreferenceStore>>,
    memory: MemoryStore,
    degraded: Arc<AtomicBool>,
}

impl Preferences {
    pub fn new<S: PreferenceStore + 'static>(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    pub fn from_shared(store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            durable: Some(store),
            memory: MemoryStore::new(),
            degraded: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Preferences that only live for this session
    pub fn memory_only() -> Self {
        Self {
            durable: None,
            memory: MemoryStore::new(),
            degraded: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether reads and writes still reach the durable store
    pub fn is_durable(&self) -> bool {
        self.durable.is_some() && !self.degraded.load(Ordering::Acquire)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(store) = self.active_store() {
            match store.get(key) {
                Ok(value) => {
                    let _ = match &value {
                        Some(v) => self.memory.set(key, v),
                        None => self.memory.remove(key),
                    };
                    return value;
                }
                Err(e) => self.degrade("read", key, e),
            }
        }

        self.memory.get(key).ok().flatten()
    }

    pub fn set(&self, key: &str, value: &str) {
        let _ = self.memory.set(key, value);

        if let Some(store) = self.active_store() {
            if let Err(e) = store.set(key, value) {
                self.degrade("write", key, e);
            }
        }
    }

    pub fn remove(&self, key: &str) {
        let _ = self.memory.remove(key);

        if let Some(store) = self.active_store() {
            if let Err(e) = store.remove(key) {
                self.degrade("remove", key, e);
            }
        }
    }

    fn active_store(&self) -> Option<&Arc<dyn PreferenceStore>> {
        if self.degraded.load(Ordering::Acquire) {
            None
        } else {
            self.durable.as_ref()
        }
    }

    fn degrade(&self, op: &str, key: &str, error: StorageError) {
        if !self.degraded.swap(true, Ordering::AcqRel) {
            tracing::warn!(
                op = %op,
                key = %key,
                error = %error,
                "Preference storage unavailable, continuing in memory"
            );
        }
    }
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences")
            .field("durable", &self.is_durable())
            .field("memory", &self.memory)
            .finish()
    }
}
