//! Engine configuration persistence
//!
//! Stores user preferences in `~/.config/vimkeys/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keymap::{parse_chord, Chord, Mode};

pub const DEFAULT_MAX_COUNT: usize = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No config directory available")]
    NoConfigDir,

    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Engine configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Chords that return to normal mode from every mode
    #[serde(default = "default_escape_chords")]
    pub escape_chords: Vec<String>,

    /// Upper bound for a consumed repeat count
    #[serde(default = "default_max_count")]
    pub max_count: usize,

    /// Mode a new session starts in
    #[serde(default)]
    pub start_mode: Mode,
}

fn default_escape_chords() -> Vec<String> {
    vec!["esc".to_string(), "mod+[".to_string()]
}

fn default_max_count() -> usize {
    DEFAULT_MAX_COUNT
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            escape_chords: default_escape_chords(),
            max_count: default_max_count(),
            start_mode: Mode::default(),
        }
    }
}

impl EngineConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`; any failure logs a warning and yields defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = crate::config_paths::config_file().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(io_error)?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Parsed escape chords; invalid entries are logged and skipped
    pub fn escape_chords(&self) -> Vec<Chord> {
        self.escape_chords
            .iter()
            .filter_map(|key| match parse_chord(key) {
                Ok(chord) => Some(chord),
                Err(e) => {
                    tracing::warn!("Ignoring escape chord {:?}: {}", key, e);
                    None
                }
            })
            .collect()
    }
}
