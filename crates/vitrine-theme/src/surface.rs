//! The document-wide theme attribute

use parking_lot::RwLock;
use std::sync::Arc;

use crate::subscription::{Listeners, Subscription};
use crate::value::ThemeValue;

/// Attribute on the document root that presentation styling keys off.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Receives every applied theme.
pub trait ThemeSurface: Send + Sync {
    fn render(&self, theme: ThemeValue);
}

/// Injectable holder for the `data-theme` attribute.
///
/// Clones share the same attribute. Every [`set`](Self::set) notifies
/// subscribers, including writes of the value already present.
#[derive(Clone)]
pub struct DocumentTheme {
    current: Arc<RwLock<Option<ThemeValue>>>,
    listeners: Listeners<ThemeValue>,
}

impl DocumentTheme {
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            listeners: Listeners::new(),
        }
    }

    /// Current attribute value, `None` before the first render
    pub fn get(&self) -> Option<ThemeValue> {
        *self.current.read()
    }

    pub fn set(&self, theme: ThemeValue) {
        *self.current.write() = Some(theme);
        self.listeners.notify(theme);
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(ThemeValue) + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(listener))
    }

    /// The attribute as it would appear in markup
    pub fn attribute(&self) -> Option<(&'static str, &'static str)> {
        self.get().map(|theme| (THEME_ATTRIBUTE, theme.as_str()))
    }
}

impl Default for DocumentTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeSurface for DocumentTheme {
    fn render(&self, theme: ThemeValue) {
        tracing::debug!(attribute = THEME_ATTRIBUTE, theme = %theme, "Rendering theme");
        self.set(theme);
    }
}

impl std::fmt::Debug for DocumentTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentTheme")
            .field("current", &self.get())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
