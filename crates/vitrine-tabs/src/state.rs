//! Tab state
//!
//! ```text
//! Inactive --select--> Active
//! Active --select other--> Inactive
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabState {
    /// Panel is shown and its trigger highlighted
    Active,
    /// Panel is hidden
    Inactive,
}

impl TabState {
    pub fn from_active(active: bool) -> Self {
        if active {
            TabState::Active
        } else {
            TabState::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, TabState::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TabState::Active => "active",
            TabState::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for TabState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
