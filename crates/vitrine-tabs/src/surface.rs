//! Document access needed by tab groups

/// Class marking the active trigger and panel in markup
pub const ACTIVE_CLASS: &str = "active";

/// The parts of a document a tab group reads and writes.
pub trait TabSurface {
    fn has_element(&self, id: &str) -> bool;

    /// Whether `id` carries the active marker
    fn is_marked_active(&self, id: &str) -> bool;

    fn set_marked_active(&mut self, id: &str, active: bool);
}
