//! Vitrine Core
//!
//! Coordinates the behavior layer of a page: one process-wide theme, the
//! page's tab groups, the mobile menu, the scroll-to-top button and the
//! viewport observers. The page itself is a plain document model; all
//! state lives here and is mirrored onto it.

mod config;
mod error;
mod event;
mod page;
mod site;

pub use config::Config;
pub use error::CoreError;
pub use event::Event;
pub use page::{Element, ElementSpec, Page, PageSpec, TabGroupSpec, BODY_ID};
pub use site::{open_preferences, PageSnapshot, Site};

// Re-export core components
pub use vitrine_nav::{MenuState, MobileMenuIds};
pub use vitrine_storage::{Database, MemoryStore, PreferenceStore, Preferences, StorageError};
pub use vitrine_tabs::{TabBinding, TabError, TabGroup, TabState};
pub use vitrine_theme::{
    os_prefers_dark, AmbientSource, DocumentTheme, ManualAmbient, Subscription, SystemAmbient,
    ThemeError, ThemePreference, ThemeSource, ThemeSurface, ThemeValue, THEME_ATTRIBUTE,
    THEME_KEY,
};
pub use vitrine_viewport::Intersection;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
