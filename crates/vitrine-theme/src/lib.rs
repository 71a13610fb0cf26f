//! Vitrine Theme
//!
//! Resolves, applies and persists the document-wide display theme.
//!
//! Three sources are reconciled:
//! 1. An explicit choice persisted under the `theme` key
//! 2. The operating system's current dark/light preference
//! 3. Live changes to that OS preference, honored only while no explicit
//!    choice is stored
//!
//! The visible effect is a single `data-theme` attribute held by
//! [`DocumentTheme`], so the reconciliation logic runs without any real
//! rendering surface.

mod ambient;
mod error;
mod preference;
mod subscription;
mod surface;
mod value;

pub use ambient::{os_prefers_dark, AmbientSource, ManualAmbient, SystemAmbient};
pub use error::ThemeError;
pub use preference::{ThemePreference, ThemeSource, THEME_KEY};
pub use subscription::Subscription;
pub use surface::{DocumentTheme, ThemeSurface, THEME_ATTRIBUTE};
pub use value::ThemeValue;

pub type Result<T> = std::result::Result<T, ThemeError>;
