//! Site configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use vitrine_nav::{MobileMenuIds, SCROLL_TO_TOP_THRESHOLD};
use vitrine_viewport::{DEFAULT_REVEAL_CLASSES, DEFAULT_REVEAL_THRESHOLD};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the preferences database
    pub database_path: PathBuf,
    /// Store preferences on disk; `false` keeps them in memory only
    pub persist_preferences: bool,
    /// Id of the theme toggle button
    pub theme_toggle_id: String,
    pub mobile_menu: MobileMenuIds,
    /// Id of the scroll-to-top button
    pub scroll_to_top_id: String,
    /// Scroll offset past which the scroll-to-top button shows
    pub scroll_to_top_threshold: f64,
    /// Classes of elements that fade in when scrolled into view
    pub reveal_classes: Vec<String>,
    pub reveal_threshold: f32,
    /// How often the OS color scheme is re-checked
    pub ambient_poll_interval_ms: u64,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("vitrine.db"),
            persist_preferences: true,
            theme_toggle_id: "themeToggle".to_string(),
            mobile_menu: MobileMenuIds::default(),
            scroll_to_top_id: "scrollToTop".to_string(),
            scroll_to_top_threshold: SCROLL_TO_TOP_THRESHOLD,
            reveal_classes: DEFAULT_REVEAL_CLASSES
                .iter()
                .map(|class| class.to_string())
                .collect(),
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
            ambient_poll_interval_ms: 2000,
        }
    }

    /// Per-user data directory (`XDG_DATA_HOME`, `LOCALAPPDATA` or
    /// `~/Library/Application Support`)
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Vitrine"))
            .unwrap_or_else(|| PathBuf::from(".vitrine"))
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn ambient_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ambient_poll_interval_ms.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
