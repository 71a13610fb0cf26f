//! Ambient (operating system) color scheme preference.
//!
//! An [`AmbientSource`] answers "does the environment prefer dark?" once at
//! startup and notifies subscribers whenever that answer changes.
//!
//! - [`SystemAmbient`] asks the OS through `dark-light` and watches for
//!   changes on a polling thread that runs while anyone is subscribed.
//! - [`ManualAmbient`] is driven by the host, which makes it the source of
//!   choice for tests and for embedders that receive change events from
//!   elsewhere.

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

use crate::subscription::{Listeners, Subscription};

/// Source of the environment's "prefers dark" signal.
pub trait AmbientSource: Send + Sync {
    /// Current preference
    fn prefers_dark(&self) -> bool;

    /// Register for change notifications.
    ///
    /// Listeners are called with the new preference only when it differs
    /// from the previous one.
    fn subscribe(&self, listener: Box<dyn Fn(bool) + Send + Sync>) -> Subscription;
}

/// Queries the operating system's current color scheme.
pub fn os_prefers_dark() -> bool {
    match detect_os_theme() {
        OsThemeMode::Dark => true,
        OsThemeMode::Light => false,
    }
}

type Detector = Arc<dyn Fn() -> bool + Send + Sync>;

struct SystemInner {
    detector: Detector,
    interval: Duration,
    last: Mutex<Option<bool>>,
    listeners: Listeners<bool>,
    watching: AtomicBool,
}

impl SystemInner {
    fn poll(&self) -> Option<bool> {
        let now = (self.detector)();
        let changed = {
            let mut last = self.last.lock();
            let changed = last.is_some_and(|previous| previous != now);
            *last = Some(now);
            changed
        };

        if changed {
            tracing::debug!(prefers_dark = now, "System color scheme changed");
            self.listeners.notify(now);
            Some(now)
        } else {
            None
        }
    }
}

/// OS-backed ambient source.
#[derive(Clone)]
pub struct SystemAmbient {
    inner: Arc<SystemInner>,
}

impl SystemAmbient {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

    pub fn new() -> Self {
        Self::with_interval(Self::DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self::with_detector(interval, os_prefers_dark)
    }

    /// Uses `detector` instead of querying the OS.
    pub fn with_detector<F>(interval: Duration, detector: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(SystemInner {
                detector: Arc::new(detector),
                interval,
                last: Mutex::new(None),
                listeners: Listeners::new(),
                watching: AtomicBool::new(false),
            }),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.inner.interval
    }

    /// Re-detect once, notifying listeners if the preference changed.
    ///
    /// The watcher thread calls this on every tick. Returns the new value
    /// when a change was observed.
    pub fn poll_once(&self) -> Option<bool> {
        self.inner.poll()
    }

    /// Whether the watcher thread is currently running
    pub fn is_watching(&self) -> bool {
        self.inner.watching.load(Ordering::Acquire)
    }

    fn ensure_watcher(&self) {
        if self.inner.watching.swap(true, Ordering::AcqRel) {
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        let interval = self.inner.interval;
        let spawned = thread::Builder::new()
            .name("vitrine-ambient".to_string())
            .spawn(move || watch(weak, interval));

        if let Err(e) = spawned {
            self.inner.watching.store(false, Ordering::Release);
            tracing::warn!(error = %e, "Could not start color scheme watcher");
        }
    }
}

fn watch(inner: Weak<SystemInner>, interval: Duration) {
    tracing::debug!(interval_ms = interval.as_millis() as u64, "Color scheme watcher started");

    loop {
        thread::sleep(interval);

        let Some(inner) = inner.upgrade() else {
            break;
        };

        if inner.listeners.is_empty() {
            inner.watching.store(false, Ordering::Release);
            // A subscriber may have arrived between the check and the store
            if inner.listeners.is_empty() || inner.watching.swap(true, Ordering::AcqRel) {
                break;
            }
        }

        inner.poll();
    }

    tracing::debug!("Color scheme watcher stopped");
}

impl Default for SystemAmbient {
    fn default() -> Self {
        Self::new()
    }
}

impl AmbientSource for SystemAmbient {
    /// Asks the detector directly. The watcher's baseline is left alone so
    /// a change is still reported to existing subscribers.
    fn prefers_dark(&self) -> bool {
        (self.inner.detector)()
    }

    fn subscribe(&self, listener: Box<dyn Fn(bool) + Send + Sync>) -> Subscription {
        {
            let mut last = self.inner.last.lock();
            if last.is_none() {
                *last = Some((self.inner.detector)());
            }
        }
        let subscription = self.inner.listeners.add(Arc::from(listener));
        self.ensure_watcher();
        subscription
    }
}

struct ManualInner {
    dark: AtomicBool,
    listeners: Listeners<bool>,
}

/// Ambient source whose preference is set by the host.
#[derive(Clone)]
pub struct ManualAmbient {
    inner: Arc<ManualInner>,
}

impl ManualAmbient {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            inner: Arc::new(ManualInner {
                dark: AtomicBool::new(prefers_dark),
                listeners: Listeners::new(),
            }),
        }
    }

    /// Report a new preference, notifying listeners if it changed
    pub fn set_prefers_dark(&self, prefers_dark: bool) -> bool {
        let previous = self.inner.dark.swap(prefers_dark, Ordering::AcqRel);
        if previous == prefers_dark {
            return false;
        }

        self.inner.listeners.notify(prefers_dark);
        true
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl AmbientSource for ManualAmbient {
    fn prefers_dark(&self) -> bool {
        self.inner.dark.load(Ordering::Acquire)
    }

    fn subscribe(&self, listener: Box<dyn Fn(bool) + Send + Sync>) -> Subscription {
        self.inner.listeners.add(Arc::from(listener))
    }
}
