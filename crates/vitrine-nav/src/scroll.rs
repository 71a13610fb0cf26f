//! Scroll-driven controls

/// Scroll offset past which the scroll-to-top button shows
pub const SCROLL_TO_TOP_THRESHOLD: f64 = 300.0;

/// Class that makes the scroll-to-top button visible
pub const VISIBLE_CLASS: &str = "visible";

/// Coalesces bursts of events into one update per animation frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for an update on the next frame.
    ///
    /// Returns `false` when one is already scheduled.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Consume the pending request at frame time
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[derive(Debug, Clone)]
pub struct ScrollToTop {
    threshold: f64,
    visible: bool,
}

impl ScrollToTop {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Recompute visibility for `scroll_y`; returns the new visibility
    /// when it changed.
    pub fn update(&mut self, scroll_y: f64) -> Option<bool> {
        let visible = scroll_y > self.threshold;
        if visible == self.visible {
            return None;
        }

        tracing::debug!(scroll_y, visible, "Scroll-to-top visibility changed");
        self.visible = visible;
        Some(visible)
    }

    /// Scroll offset the button sends the page to
    pub fn target(&self) -> f64 {
        0.0
    }
}

impl Default for ScrollToTop {
    fn default() -> Self {
        Self::new(SCROLL_TO_TOP_THRESHOLD)
    }
}
