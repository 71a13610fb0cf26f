//! Vitrine Navigation Controls
//!
//! - Mobile menu: open/closed panel with its toggle button, closed by link
//!   clicks and by clicks outside it
//! - Scroll-to-top button: shown once the page is scrolled past a
//!   threshold, updated at most once per animation frame

mod menu;
mod scroll;

pub use menu::{MenuState, MobileMenu, MobileMenuIds};
pub use scroll::{FrameGate, ScrollToTop, SCROLL_TO_TOP_THRESHOLD, VISIBLE_CLASS};
