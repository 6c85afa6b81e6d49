//! Configuration system
//!
//! Render settings loadable from TOML, with sensible defaults for demos
//! that ship no config file.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Renderer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Background color written behind the scene
    pub background: [u8; 3],
    /// Number of frames a demo run renders
    pub frames: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: [16, 16, 24],
            frames: 120,
        }
    }
}

impl RenderConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a file when it exists, defaults otherwise
    pub fn load_or_default(path: &str) -> Result<Self, ConfigError> {
        if std::path::Path::new(path).exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config_fills_defaults() {
        let config: RenderConfig = toml::from_str("width = 320\nheight = 240\n").unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 240);
        assert_eq!(config.frames, RenderConfig::default().frames);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = RenderConfig::load_or_default("does-not-exist.toml").unwrap();
        assert_eq!(config.width, 800);
    }
}
