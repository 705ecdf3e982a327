use crate::expression::Thresholds;
use crate::manipulation::DEFAULT_SCALE;
use anyhow::{Context, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmojifyConfig {
    pub thresholds: Thresholds,
    /// Emoji width relative to face width
    pub emoji_scale: f32,
    /// Shrink photos so their longest side is at most this many pixels
    /// before drawing.
    pub max_dimension: Option<u32>,
}

impl Default for EmojifyConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            emoji_scale: DEFAULT_SCALE,
            max_dimension: None,
        }
    }
}

impl EmojifyConfig {
    /// Load config from file, falling back to defaults when it doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self =
            serde_json::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.emoji_scale > 0.) {
            return Err(Error::msg(format!(
                "emoji_scale must be > 0, got {}",
                self.emoji_scale
            )));
        }

        if self.max_dimension == Some(0) {
            return Err(Error::msg("max_dimension must be > 0"));
        }

        Ok(())
    }
}
