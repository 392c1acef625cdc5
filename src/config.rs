//! # Configuration Module
//!
//! Holds the immutable [`EngineConfig`] handed to every analyzer and the
//! logic for locating and loading it.
//!
//! ## Config File Location
//!
//! When no explicit `--config` path is given, Tuneprint looks for
//! `config.json` in the platform-standard config directory:
//! - Linux: `~/.config/tuneprint/config.json`
//! - macOS: `~/Library/Application Support/tuneprint/config.json`
//! - Windows: `%APPDATA%\tuneprint\config.json`
//!
//! A missing file is not an error; the built-in defaults apply. Every section
//! is `#[serde(default)]`, so a config file only needs the keys it overrides:
//!
//! ```json
//! {
//!   "personality": { "compatibility_bands": { "top": 80, "high": 60, "moderate": 45 } },
//!   "focus_period": "long_term"
//! }
//! ```
//!
//! Run `tuneprint config` to print the full default document.

use crate::diversity::DiversityConfig;
use crate::mood::MoodConfig;
use crate::normalize::NormalizerConfig;
use crate::nostalgia::NostalgiaConfig;
use crate::personality::PersonalityConfig;
use crate::record::TimePeriod;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";

/// Everything an analysis run can be tuned with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub normalizer: NormalizerConfig,
    pub diversity: DiversityConfig,
    pub nostalgia: NostalgiaConfig,
    pub mood: MoodConfig,
    pub personality: PersonalityConfig,
    /// Restrict diversity and mood analysis to one window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_period: Option<TimePeriod>,
}

impl EngineConfig {
    /// Load from `path`, or from the default location when `path` is `None`.
    ///
    /// An explicit path must exist. The default location may be absent, in
    /// which case defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, if any file cannot be
    /// read, or if its JSON does not match the config schema.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a config file
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not a valid config document.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Pretty JSON of this config, suitable for saving and editing
    ///
    /// # Errors
    ///
    /// Only fails if serialization itself fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize configuration")
    }

    #[must_use]
    pub fn with_focus(mut self, period: Option<TimePeriod>) -> Self {
        if period.is_some() {
            self.focus_period = period;
        }
        self
    }
}

/// `<platform config dir>/tuneprint/config.json`, if the platform has one
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tuneprint").join(CONFIG_FILE))
}
