//! Vitrine Viewport Observers
//!
//! Both observers consume [`Intersection`] reports for the elements they
//! watch and return what the document should change:
//!
//! - [`LazyImages`]: swaps `data-src` into `src` the first time an image
//!   scrolls into view, then stops watching it
//! - [`RevealObserver`]: adds the `fade-in` class to cards once enough of
//!   them is visible

mod intersection;
mod lazy;
mod reveal;

pub use intersection::Intersection;
pub use lazy::{ImageLoad, LazyImages, DATA_SRC_ATTRIBUTE, IMAGE_TAG, LAZY_CLASS};
pub use reveal::{RevealObserver, DEFAULT_REVEAL_CLASSES, DEFAULT_REVEAL_THRESHOLD, FADE_IN_CLASS};
