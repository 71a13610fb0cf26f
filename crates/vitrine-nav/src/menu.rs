//! Mobile menu
//!
//! ```text
//! Closed --toggle--> Open
//! Open --toggle | link click | outside click--> Closed
//! ```
//!
//! While open the menu carries the `active` class, the menu icon is hidden,
//! the close icon is shown and the body stops scrolling.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuState {
    Open,
    #[default]
    Closed,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        matches!(self, MenuState::Open)
    }

    /// `overflow` style for the document body
    pub fn body_overflow(&self) -> Option<&'static str> {
        match self {
            MenuState::Open => Some("hidden"),
            MenuState::Closed => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuState::Open => "open",
            MenuState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for MenuState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Element ids the menu is wired to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobileMenuIds {
    pub toggle: String,
    pub menu: String,
    pub menu_icon: String,
    pub close_icon: String,
    /// Class marking links that close the menu
    pub link_class: String,
}

impl Default for MobileMenuIds {
    fn default() -> Self {
        Self {
            toggle: "mobileMenuToggle".to_string(),
            menu: "mobileMenu".to_string(),
            menu_icon: "menuIcon".to_string(),
            close_icon: "closeIcon".to_string(),
            link_class: "mobile-nav-link".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MobileMenu {
    state: MenuState,
}

impl MobileMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn toggle(&mut self) -> MenuState {
        let next = match self.state {
            MenuState::Open => MenuState::Closed,
            MenuState::Closed => MenuState::Open,
        };
        self.transition(next)
    }

    pub fn open(&mut self) -> MenuState {
        self.transition(MenuState::Open)
    }

    pub fn close(&mut self) -> MenuState {
        self.transition(MenuState::Closed)
    }

    /// Handle a document click that was not on the toggle.
    ///
    /// Clicking a menu link closes the menu, as does clicking anywhere
    /// outside the menu. Returns whether the menu closed.
    pub fn on_click(&mut self, inside_menu: bool, on_link: bool) -> bool {
        if !self.is_open() {
            return false;
        }

        if on_link || !inside_menu {
            self.close();
            return true;
        }

        false
    }

    fn transition(&mut self, next: MenuState) -> MenuState {
        if self.state != next {
            tracing::debug!(from = %self.state, to = %next, "Mobile menu transition");
        }
        self.state = next;
        next
    }
}
