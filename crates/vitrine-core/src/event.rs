//! Events the page reacts to

use serde::{Deserialize, Serialize};

use vitrine_viewport::Intersection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A click on the element with this id
    Click { target: String },
    /// The page scrolled to this vertical offset
    Scroll { y: f64 },
    /// An animation frame
    Frame,
    /// Visibility reports from the viewport
    Intersect { entries: Vec<Intersection> },
    /// The OS color scheme changed
    SystemTheme { dark: bool },
}

impl Event {
    pub fn click(target: impl Into<String>) -> Self {
        Event::Click {
            target: target.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::Click { .. } => "click",
            Event::Scroll { .. } => "scroll",
            Event::Frame => "frame",
            Event::Intersect { .. } => "intersect",
            Event::SystemTheme { .. } => "system_theme",
        }
    }

    /// Parse a JSON array of events
    pub fn list_from_json(json: &str) -> crate::Result<Vec<Event>> {
        Ok(serde_json::from_str(json)?)
    }
}
