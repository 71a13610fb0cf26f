//! Vitrine Tab Groups
//!
//! A tab group is a set of (trigger, panel) pairs sharing one
//! mutual-exclusion domain: exactly one panel, and its trigger, is active
//! at any time after construction. Each cluster of tabs on a page gets its
//! own independent group.

mod error;
mod group;
mod state;
mod surface;

pub use error::TabError;
pub use group::{TabBinding, TabGroup};
pub use state::TabState;
pub use surface::{TabSurface, ACTIVE_CLASS};

pub type Result<T> = std::result::Result<T, TabError>;
