//! Application settings and configuration management

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::player::RepeatMode;

const APP_DIR: &str = "playdeck";

/// Application settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Root of the directory-backed library (`tracks.json`, `audio/`, `recents.json`)
    #[serde(default = "default_library_dir")]
    pub library_dir: PathBuf,
    /// Delay before a toast clears itself
    #[serde(default = "default_toast_clear_ms")]
    pub toast_clear_ms: u64,
    /// Past this much elapsed time, "previous" restarts the current track
    #[serde(default = "default_restart_threshold_ms")]
    pub restart_threshold_ms: u64,
    /// Maximum length of the recently played ledger
    #[serde(default = "default_recents_limit")]
    pub recents_limit: usize,
    /// Attempts at picking a different track on shuffle-next before accepting a repeat
    #[serde(default = "default_shuffle_retry_limit")]
    pub shuffle_retry_limit: u32,
    /// Progress event interval of the output clock
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,
    #[serde(default = "default_command_buffer_size")]
    pub command_buffer_size: usize,
    #[serde(default = "default_state_update_capacity")]
    pub state_update_capacity: usize,
    /// Shuffle flag at startup
    #[serde(default)]
    pub shuffle: bool,
    /// Repeat mode at startup
    #[serde(default)]
    pub repeat: RepeatMode,
}

fn default_library_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("library")
}

fn default_toast_clear_ms() -> u64 {
    3000
}

fn default_restart_threshold_ms() -> u64 {
    3000
}

fn default_recents_limit() -> usize {
    crate::library::DEFAULT_RECENTS_LIMIT
}

fn default_shuffle_retry_limit() -> u32 {
    crate::player::DEFAULT_SHUFFLE_RETRY_LIMIT
}

fn default_progress_interval_ms() -> u64 {
    250
}

fn default_command_buffer_size() -> usize {
    32
}

fn default_state_update_capacity() -> usize {
    64
}

/// Error types for configuration operations
#[derive(Debug)]
pub enum ConfigError {
    IoError(io::Error),
    ParseError(String),
    ValidationError(String),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigError::ParseError(s) => write!(f, "Parse error: {}", s),
            ConfigError::ValidationError(s) => write!(f, "Validation error: {}", s),
        }
    }
}

impl Error for ConfigError {}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            library_dir: default_library_dir(),
            toast_clear_ms: default_toast_clear_ms(),
            restart_threshold_ms: default_restart_threshold_ms(),
            recents_limit: default_recents_limit(),
            shuffle_retry_limit: default_shuffle_retry_limit(),
            progress_interval_ms: default_progress_interval_ms(),
            command_buffer_size: default_command_buffer_size(),
            state_update_capacity: default_state_update_capacity(),
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

impl Settings {
    /// Load settings from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(&self)?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.json")
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.library_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError("Library directory cannot be empty".to_string()));
        }

        let non_zero = [
            ("toast_clear_ms", self.toast_clear_ms as u128),
            ("restart_threshold_ms", self.restart_threshold_ms as u128),
            ("recents_limit", self.recents_limit as u128),
            ("shuffle_retry_limit", self.shuffle_retry_limit as u128),
            ("progress_interval_ms", self.progress_interval_ms as u128),
            ("command_buffer_size", self.command_buffer_size as u128),
            ("state_update_capacity", self.state_update_capacity as u128),
        ];
        if let Some((name, _)) = non_zero.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ValidationError(format!("{} must be greater than zero", name)));
        }

        Ok(())
    }
}
