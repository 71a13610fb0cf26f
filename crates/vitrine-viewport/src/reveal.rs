//! Reveal-on-scroll animations

use std::collections::BTreeSet;

use crate::intersection::Intersection;

/// Class that triggers the fade-in animation
pub const FADE_IN_CLASS: &str = "fade-in";

/// Visible fraction needed before an element is revealed
pub const DEFAULT_REVEAL_THRESHOLD: f32 = 0.1;

/// Classes of the cards that animate in
pub const DEFAULT_REVEAL_CLASSES: &[&str] = &[
    "news-card",
    "match-card",
    "player-card",
    "gallery-item",
    "video-card",
    "press-item",
];

#[derive(Debug, Clone)]
pub struct RevealObserver {
    threshold: f32,
    observed: BTreeSet<String>,
    revealed: BTreeSet<String>,
}

impl RevealObserver {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            observed: BTreeSet::new(),
            revealed: BTreeSet::new(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn observe(&mut self, id: impl Into<String>) {
        self.observed.insert(id.into());
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }

    /// Ids that crossed the threshold for the first time
    pub fn on_intersection(&mut self, entries: &[Intersection]) -> Vec<String> {
        let mut newly = Vec::new();

        for entry in entries {
            if !entry.is_intersecting() || entry.ratio < self.threshold {
                continue;
            }
            if !self.observed.contains(&entry.target) {
                continue;
            }
            if self.revealed.insert(entry.target.clone()) {
                newly.push(entry.target.clone());
            }
        }

        if !newly.is_empty() {
            tracing::debug!(count = newly.len(), "Revealing elements");
        }

        newly
    }
}

impl Default for RevealObserver {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_THRESHOLD)
    }
}
