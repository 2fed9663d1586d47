//! Inspector settings, persisted as JSON next to the other config files.

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::paths::{self, PathConfig};

/// Settings file name inside the config directory
pub const SETTINGS_FILE: &str = "scene-inspect.json";

/// Inspector settings
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct InspectorSettings {
    /// Frames between walker observations (min 1)
    pub poll_interval: u32,
    /// Bounds of unit-interval sliders (opacity, roughness, ...)
    pub default_range: [f32; 2],
    /// Tree items start expanded
    pub expand_new_items: bool,
    pub pane_title: String,
    /// Show the outliner next to the pane
    pub show_tree: bool,
}

impl Default for InspectorSettings {
    fn default() -> Self {
        Self {
            poll_interval: 1,
            default_range: [0.0, 1.0],
            expand_new_items: true,
            pane_title: "Inspector".to_string(),
            show_tree: true,
        }
    }
}

impl InspectorSettings {
    /// Effective poll interval, never zero.
    pub fn poll_every(&self) -> u64 {
        u64::from(self.poll_interval.max(1))
    }

    /// Slider bounds as (min, max); an inverted range is swapped.
    pub fn unit_range(&self) -> (f32, f32) {
        let [a, b] = self.default_range;
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Read settings from `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        let settings = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))?;
        Ok(settings)
    }

    /// Write settings to `path`, creating the parent directory.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create settings directory: {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write settings: {}", path.display()))?;
        debug!("settings saved to {}", path.display());
        Ok(())
    }

    /// Load from the configured settings file. Missing or malformed files
    /// give defaults.
    pub fn load(config: &PathConfig) -> Self {
        let path = paths::config_file(SETTINGS_FILE, config);
        if !path.exists() {
            debug!("no settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{e:#}, using defaults");
                Self::default()
            }
        }
    }

    /// Save to the configured settings file.
    pub fn save(&self, config: &PathConfig) -> Result<()> {
        paths::ensure_dirs(config)?;
        self.save_to(&paths::config_file(SETTINGS_FILE, config))
    }
}
