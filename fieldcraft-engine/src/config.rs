//! Engine configuration, read from an optional `fieldcraft.toml`.

use crate::error::{EngineError, EngineResult};
use fieldcraft_codec::MediaDetail;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// How root-level name collisions across field groups are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The later group's definition silently replaces the earlier one.
    #[default]
    LastWriteWins,
    /// Field groups with any name collision are refused up front.
    Reject,
}

/// Engine settings. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Detail level of media objects in API output.
    pub media_detail: MediaDetail,
    /// Prepended to field names to form Options Store keys.
    pub options_key_prefix: String,
    pub name_collisions: CollisionPolicy,
}

fn default_options_key_prefix() -> String {
    "options_".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            media_detail: MediaDetail::Basic,
            options_key_prefix: default_options_key_prefix(),
            name_collisions: CollisionPolicy::LastWriteWins,
        }
    }
}

impl EngineConfig {
    /// Parses and checks a TOML document.
    pub fn from_toml_str(contents: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.check()?;
        Ok(config)
    }

    /// Reads a config file, failing on a missing or malformed file.
    pub fn read(path: &Path) -> EngineResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Loads a config file if one exists. Falls back to defaults, with a
    /// warning, when the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No config file found at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::read(path) {
            Ok(config) => {
                info!("Loaded engine config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("Failed to load config file {:?}: {}. Falling back to defaults.", path, e);
                Self::default()
            }
        }
    }

    /// Option key for a field on an options page.
    pub fn options_key(&self, name: &str) -> String {
        format!("{}{}", self.options_key_prefix, name)
    }

    fn check(&self) -> EngineResult<()> {
        if self.options_key_prefix.trim().is_empty() {
            return Err(EngineError::Config(
                "options_key_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
