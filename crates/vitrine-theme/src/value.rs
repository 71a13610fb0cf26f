//! Theme values

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeValue {
    #[default]
    Light,
    Dark,
}

impl ThemeValue {
    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark {
            ThemeValue::Dark
        } else {
            ThemeValue::Light
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, ThemeValue::Dark)
    }

    /// The opposite value
    pub fn toggled(&self) -> Self {
        match self {
            ThemeValue::Light => ThemeValue::Dark,
            ThemeValue::Dark => ThemeValue::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeValue::Light => "light",
            ThemeValue::Dark => "dark",
        }
    }
}

impl std::fmt::Display for ThemeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ThemeValue {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeValue::Light),
            "dark" => Ok(ThemeValue::Dark),
            _ => Err(ThemeError::InvalidValue(s.to_string())),
        }
    }
}
