//! Lazy image loading

use std::collections::BTreeMap;

use crate::intersection::Intersection;

/// Attribute holding the deferred image source
pub const DATA_SRC_ATTRIBUTE: &str = "data-src";

/// Class removed once the image loads
pub const LAZY_CLASS: &str = "lazy";

/// Only elements with this tag are lazily loaded
pub const IMAGE_TAG: &str = "img";

/// An image that should load now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLoad {
    pub id: String,
    pub src: String,
}

/// Images waiting to scroll into view, keyed by element id.
#[derive(Debug, Clone, Default)]
pub struct LazyImages {
    pending: BTreeMap<String, String>,
}

impl LazyImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, id: impl Into<String>, src: impl Into<String>) {
        self.pending.insert(id.into(), src.into());
    }

    pub fn is_observing(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Process a batch of intersection reports.
    ///
    /// Every observed image that intersects is returned once and
    /// unobserved.
    pub fn on_intersection(&mut self, entries: &[Intersection]) -> Vec<ImageLoad> {
        let mut loads = Vec::new();

        for entry in entries.iter().filter(|e| e.is_intersecting()) {
            if let Some(src) = self.pending.remove(&entry.target) {
                tracing::debug!(id = %entry.target, src = %src, "Loading lazy image");
                loads.push(ImageLoad {
                    id: entry.target.clone(),
                    src,
                });
            }
        }

        loads
    }
}
