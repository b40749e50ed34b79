use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::args::Args;

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub log_filter: Option<String>,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    /// Replaces the demo's own window title
    pub title: Option<String>,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: None,
            vsync: true,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path)?;
        Self::from_toml(&config_str)
    }

    pub fn from_toml(config_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(config_str)?)
    }

    /// Command line flags win over the file. `--log` is not copied, logging
    /// is set up before the config is merged.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(width) = args.width {
            self.window.width = width;
        }
        if let Some(height) = args.height {
            self.window.height = height;
        }
        if args.no_vsync {
            self.window.vsync = false;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.window.width, self.window.height);
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidSize(width, height));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Input(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Format(#[from] toml::de::Error),
    #[error("invalid window size {0}x{1}")]
    InvalidSize(u32, u32),
}
