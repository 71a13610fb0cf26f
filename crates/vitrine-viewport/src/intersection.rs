//! Intersection reports

use serde::{Deserialize, Serialize};

/// How much of an element is inside the viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub target: String,
    /// Visible fraction of the element, 0.0 to 1.0
    pub ratio: f32,
}

impl Intersection {
    pub fn new(target: impl Into<String>, ratio: f32) -> Self {
        Self {
            target: target.into(),
            ratio: ratio.clamp(0.0, 1.0),
        }
    }

    pub fn is_intersecting(&self) -> bool {
        self.ratio > 0.0
    }
}
