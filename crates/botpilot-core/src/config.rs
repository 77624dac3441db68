//! Control-panel configuration.
//!
//! Stored as JSON. Missing fields take their defaults, so a file only needs
//! to name what it changes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transport::{CONTROL_PORT, DEFAULT_CONNECT_TIMEOUT, Endpoint, TransportResult};
use crate::widget::Direction;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Bytes sent when a pad direction is pressed. Their meaning belongs to the
/// robot, not to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadCommands {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
}

impl Default for PadCommands {
    fn default() -> Self {
        Self {
            up: "U".to_string(),
            down: "D".to_string(),
            left: "L".to_string(),
            right: "R".to_string(),
        }
    }
}

impl PadCommands {
    pub fn payload(&self, direction: Direction) -> &[u8] {
        match direction {
            Direction::Up => self.up.as_bytes(),
            Direction::Down => self.down.as_bytes(),
            Direction::Left => self.left.as_bytes(),
            Direction::Right => self.right.as_bytes(),
        }
    }
}

/// Control-panel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    /// `tcp://host[:port]` or `rfcomm:///dev/rfcommN`
    pub endpoint: String,
    pub connect_timeout_ms: u64,
    /// Screen position the directional pad is centered on.
    pub pad_center: (f64, f64),
    /// Distance of each pad button from the center.
    pub pad_offset: f64,
    pub commands: PadCommands,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            endpoint: format!("tcp://127.0.0.1:{CONTROL_PORT}"),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT.as_millis() as u64,
            pad_center: (320.0, 240.0),
            pad_offset: 60.0,
            commands: PadCommands::default(),
        }
    }
}

impl PilotConfig {
    /// Parse the configured endpoint.
    pub fn endpoint(&self) -> TransportResult<Endpoint> {
        self.endpoint.parse()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn pad_center(&self) -> Point {
        Point::new(self.pad_center.0, self.pad_center.1)
    }

    /// Parse a config document, which must be a JSON object.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if !value.is_object() {
            return Err(ConfigError::Parse("expected a JSON object".to_string()));
        }
        serde_json::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Default config location.
    ///
    /// On Unix: `~/.config/botpilot/config.json`
    /// On Windows: `%APPDATA%\botpilot\config.json`
    pub fn default_path() -> ConfigResult<PathBuf> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| ConfigError::Io("Could not determine config directory".to_string()))?;
        Ok(base.join("botpilot").join("config.json"))
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => {
                log::info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Write the config, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(path, self.to_json()?)
            .map_err(|e| ConfigError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }
}
