//! Theme preference reconciliation
//!
//! ```text
//!            toggle / apply_theme (persisted)
//!   Light  <------------------------------>  Dark
//!            system change (only while nothing is persisted)
//! ```
//!
//! Startup resolves the persisted explicit choice first and falls back to
//! the ambient preference. Startup only renders; nothing is persisted until
//! a toggle, an explicit apply, or an ambient change that arrives while no
//! choice is stored.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::{Arc, Weak};

use vitrine_storage::Preferences;

use crate::ambient::AmbientSource;
use crate::subscription::Subscription;
use crate::surface::ThemeSurface;
use crate::value::ThemeValue;

/// Preference key holding the explicit choice
pub const THEME_KEY: &str = "theme";

/// Where the current theme came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSource {
    /// A persisted explicit choice
    Stored,
    /// The environment's preference
    Ambient,
}

impl ThemeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeSource::Stored => "stored",
            ThemeSource::Ambient => "ambient",
        }
    }
}

impl std::fmt::Display for ThemeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

struct ThemeInner {
    current: ThemeValue,
    last_ambient_dark: bool,
    preferences: Preferences,
    surface: Arc<dyn ThemeSurface>,
}

impl ThemeInner {
    fn stored_theme(&self) -> Option<ThemeValue> {
        let raw = self.preferences.get(THEME_KEY)?;
        match raw.parse() {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::warn!(value = %raw, error = %e, "Ignoring invalid stored theme");
                None
            }
        }
    }

    /// Sets and persists `theme`, returning the surface to render on.
    fn apply(&mut self, theme: ThemeValue) -> Arc<dyn ThemeSurface> {
        if self.current != theme {
            tracing::debug!(from = %self.current, to = %theme, "Theme transition");
        }
        self.current = theme;
        self.preferences.set(THEME_KEY, theme.as_str());
        Arc::clone(&self.surface)
    }
}

/// Single source of truth for the displayed theme.
///
/// Holds a subscription to its ambient source for as long as it lives (or
/// until [`detach_ambient`](Self::detach_ambient)).
pub struct ThemePreference {
    inner: Arc<Mutex<ThemeInner>>,
    ambient: Mutex<Option<Subscription>>,
}

impl ThemePreference {
    /// Resolve the initial theme, render it and start tracking `ambient`.
    pub fn new(
        preferences: Preferences,
        surface: Arc<dyn ThemeSurface>,
        ambient: &dyn AmbientSource,
    ) -> Self {
        let ambient_dark = ambient.prefers_dark();

        let mut inner = ThemeInner {
            current: ThemeValue::from_dark(ambient_dark),
            last_ambient_dark: ambient_dark,
            preferences,
            surface,
        };

        let source = match inner.stored_theme() {
            Some(stored) => {
                inner.current = stored;
                ThemeSource::Stored
            }
            None => ThemeSource::Ambient,
        };

        let current = inner.current;
        inner.surface.render(current);

        tracing::info!(theme = %current, source = %source, "Theme resolved");

        let inner = Arc::new(Mutex::new(inner));
        let subscription = subscribe_ambient(Arc::downgrade(&inner), ambient);

        Self {
            inner,
            ambient: Mutex::new(Some(subscription)),
        }
    }

    pub fn current(&self) -> ThemeValue {
        self.inner.lock().current
    }

    /// Whether an explicit choice is persisted right now
    pub fn has_explicit_choice(&self) -> bool {
        self.inner.lock().stored_theme().is_some()
    }

    pub fn source(&self) -> ThemeSource {
        if self.has_explicit_choice() {
            ThemeSource::Stored
        } else {
            ThemeSource::Ambient
        }
    }

    /// Set, persist and render `theme`.
    ///
    /// Applying the current value again re-writes the same persisted value
    /// and re-renders; nothing else observable happens.
    pub fn apply_theme(&self, theme: ThemeValue) {
        let surface = self.inner.lock().apply(theme);
        surface.render(theme);
    }

    /// Flip the theme and persist the result as an explicit choice
    pub fn toggle(&self) -> ThemeValue {
        let (next, surface) = {
            let mut inner = self.inner.lock();
            let next = inner.current.toggled();
            (next, inner.apply(next))
        };
        surface.render(next);

        tracing::info!(theme = %next, "Theme toggled");
        next
    }

    /// Handle an ambient preference change.
    ///
    /// Ignored while an explicit choice is persisted; otherwise the same
    /// as [`apply_theme`](Self::apply_theme). Returns whether it applied.
    pub fn on_system_preference_changed(&self, is_dark: bool) -> bool {
        apply_ambient_change(&self.inner, is_dark)
    }

    /// Forget the explicit choice and fall back to the ambient preference.
    ///
    /// Ambient changes are honored again afterwards, within this session
    /// and across restarts.
    pub fn clear_explicit_choice(&self) -> ThemeValue {
        let (theme, surface) = {
            let mut inner = self.inner.lock();
            inner.preferences.remove(THEME_KEY);
            inner.current = ThemeValue::from_dark(inner.last_ambient_dark);
            (inner.current, Arc::clone(&inner.surface))
        };
        surface.render(theme);

        tracing::info!(theme = %theme, "Explicit theme choice cleared");
        theme
    }

    /// Stop reacting to ambient changes
    pub fn detach_ambient(&self) {
        if let Some(subscription) = self.ambient.lock().take() {
            subscription.unsubscribe();
        }
    }

    pub fn is_tracking_ambient(&self) -> bool {
        self.ambient.lock().is_some()
    }
}

impl std::fmt::Debug for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemePreference")
            .field("current", &self.current())
            .field("tracking_ambient", &self.is_tracking_ambient())
            .finish()
    }
}

fn subscribe_ambient(inner: Weak<Mutex<ThemeInner>>, ambient: &dyn AmbientSource) -> Subscription {
    ambient.subscribe(Box::new(move |is_dark: bool| {
        if let Some(inner) = inner.upgrade() {
            apply_ambient_change(&inner, is_dark);
        }
    }))
}

fn apply_ambient_change(inner: &Mutex<ThemeInner>, is_dark: bool) -> bool {
    let theme = ThemeValue::from_dark(is_dark);
    let surface = {
        let mut inner = inner.lock();
        inner.last_ambient_dark = is_dark;

        if inner.stored_theme().is_some() {
            tracing::debug!(prefers_dark = is_dark, "Explicit theme set, ignoring system change");
            return false;
        }

        inner.apply(theme)
    };
    surface.render(theme);

    tracing::info!(theme = %theme, "Theme follows system preference");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambient::ManualAmbient;
    use crate::surface::DocumentTheme;
    use vitrine_storage::{Database, MemoryStore, PreferenceStore};

    fn setup(
        stored: Option<&str>,
        prefers_dark: bool,
    ) -> (ThemePreference, MemoryStore, DocumentTheme, ManualAmbient) {
        let store = MemoryStore::new();
        if let Some(value) = stored {
            store.set(THEME_KEY, value).unwrap();
        }
        let doc = DocumentTheme::new();
        let ambient = ManualAmbient::new(prefers_dark);
        let theme = ThemePreference::new(
            Preferences::new(store.clone()),
            Arc::new(doc.clone()),
            &ambient,
        );
        (theme, store, doc, ambient)
    }

    fn stored(store: &MemoryStore) -> Option<String> {
        store.get(THEME_KEY).unwrap()
    }

    #[test]
    fn test_initial_follows_ambient_without_persisting() {
        let (theme, store, doc, _ambient) = setup(None, true);

        assert_eq!(theme.current(), ThemeValue::Dark);
        assert_eq!(doc.get(), Some(ThemeValue::Dark));
        assert_eq!(theme.source(), ThemeSource::Ambient);
        assert_eq!(stored(&store), None);
    }

    #[test]
    fn test_toggle_parity() {
        for n in 0..6 {
            let (theme, store, doc, _ambient) = setup(None, false);
            for _ in 0..n {
                theme.toggle();
            }

            let expected = if n % 2 == 0 {
                ThemeValue::Light
            } else {
                ThemeValue::Dark
            };
            assert_eq!(theme.current(), expected, "after {} toggles", n);
            assert_eq!(doc.get(), Some(expected));
            if n > 0 {
                assert_eq!(stored(&store).as_deref(), Some(expected.as_str()));
            }
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let (theme, store, doc, _ambient) = setup(None, false);

        theme.apply_theme(ThemeValue::Dark);
        let first = (theme.current(), stored(&store), doc.get());
        theme.apply_theme(ThemeValue::Dark);
        let second = (theme.current(), stored(&store), doc.get());

        assert_eq!(first, second);
        assert_eq!(second.1.as_deref(), Some("dark"));
    }

    #[test]
    fn test_ambient_change_applies_without_explicit_choice() {
        let (theme, store, doc, ambient) = setup(None, true);
        assert_eq!(theme.current(), ThemeValue::Dark);

        ambient.set_prefers_dark(false);

        assert_eq!(theme.current(), ThemeValue::Light);
        assert_eq!(doc.get(), Some(ThemeValue::Light));
        assert_eq!(stored(&store).as_deref(), Some("light"));
    }

    #[test]
    fn test_stored_choice_overrides_and_locks_out_ambient() {
        let (theme, store, doc, ambient) = setup(Some("light"), true);

        assert_eq!(theme.current(), ThemeValue::Light);
        assert_eq!(theme.source(), ThemeSource::Stored);

        ambient.set_prefers_dark(false);
        ambient.set_prefers_dark(true);

        assert_eq!(theme.current(), ThemeValue::Light);
        assert_eq!(doc.get(), Some(ThemeValue::Light));
        assert_eq!(stored(&store).as_deref(), Some("light"));
    }

    #[test]
    fn test_toggle_locks_out_ambient() {
        let (theme, _store, _doc, ambient) = setup(None, false);

        assert_eq!(theme.toggle(), ThemeValue::Dark);
        ambient.set_prefers_dark(true);
        ambient.set_prefers_dark(false);

        assert_eq!(theme.current(), ThemeValue::Dark);
        assert!(!theme.on_system_preference_changed(false));
    }

    #[test]
    fn test_clear_reenables_ambient() {
        let (theme, store, _doc, ambient) = setup(Some("dark"), false);
        assert_eq!(theme.current(), ThemeValue::Dark);

        assert_eq!(theme.clear_explicit_choice(), ThemeValue::Light);
        assert_eq!(stored(&store), None);
        assert_eq!(theme.source(), ThemeSource::Ambient);

        ambient.set_prefers_dark(true);
        assert_eq!(theme.current(), ThemeValue::Dark);
    }

    #[test]
    fn test_clear_uses_latest_ambient_value() {
        let (theme, _store, _doc, ambient) = setup(Some("light"), false);

        // Ignored while the choice exists, but remembered
        ambient.set_prefers_dark(true);
        assert_eq!(theme.current(), ThemeValue::Light);

        assert_eq!(theme.clear_explicit_choice(), ThemeValue::Dark);
    }

    #[test]
    fn test_invalid_stored_value_is_ignored() {
        let (theme, _store, _doc, ambient) = setup(Some("sepia"), true);

        assert_eq!(theme.current(), ThemeValue::Dark);
        assert!(!theme.has_explicit_choice());

        ambient.set_prefers_dark(false);
        assert_eq!(theme.current(), ThemeValue::Light);
    }

    #[test]
    fn test_detach_stops_ambient_updates() {
        let (theme, _store, _doc, ambient) = setup(None, false);
        assert_eq!(ambient.subscriber_count(), 1);

        theme.detach_ambient();
        assert!(!theme.is_tracking_ambient());
        assert_eq!(ambient.subscriber_count(), 0);

        ambient.set_prefers_dark(true);
        assert_eq!(theme.current(), ThemeValue::Light);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (theme, _store, _doc, ambient) = setup(None, false);
        drop(theme);
        assert_eq!(ambient.subscriber_count(), 0);
    }

    #[test]
    fn test_memory_only_session() {
        let doc = DocumentTheme::new();
        let ambient = ManualAmbient::new(false);
        let theme = ThemePreference::new(Preferences::memory_only(), Arc::new(doc.clone()), &ambient);

        theme.toggle();
        assert_eq!(theme.current(), ThemeValue::Dark);
        assert!(theme.has_explicit_choice());
    }

    #[test]
    fn test_choice_survives_restart() {
        let db = Database::open_in_memory().unwrap();
        let ambient = ManualAmbient::new(false);

        {
            let theme = ThemePreference::new(
                Preferences::new(db.clone()),
                Arc::new(DocumentTheme::new()),
                &ambient,
            );
            theme.toggle();
        }

        let doc = DocumentTheme::new();
        let theme = ThemePreference::new(Preferences::new(db), Arc::new(doc.clone()), &ambient);
        assert_eq!(theme.current(), ThemeValue::Dark);
        assert_eq!(doc.get(), Some(ThemeValue::Dark));
    }

    #[test]
    fn test_pages_sharing_system_source_follow_change() {
        use crate::ambient::SystemAmbient;
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::time::Duration;

        static DARK: AtomicBool = AtomicBool::new(true);

        let ambient =
            SystemAmbient::with_detector(Duration::from_secs(3600), || DARK.load(Ordering::SeqCst));

        let index_doc = DocumentTheme::new();
        let index = ThemePreference::new(
            Preferences::new(MemoryStore::new()),
            Arc::new(index_doc.clone()),
            &ambient,
        );
        assert_eq!(index.current(), ThemeValue::Dark);

        DARK.store(false, Ordering::SeqCst);
        let schedule = ThemePreference::new(
            Preferences::new(MemoryStore::new()),
            Arc::new(DocumentTheme::new()),
            &ambient,
        );
        assert_eq!(schedule.current(), ThemeValue::Light);

        assert_eq!(ambient.poll_once(), Some(false));
        assert_eq!(index.current(), ThemeValue::Light);
        assert_eq!(index_doc.get(), Some(ThemeValue::Light));
        assert_eq!(schedule.current(), ThemeValue::Light);
    }
}
