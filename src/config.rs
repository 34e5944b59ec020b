//! Application configuration
//!
//! Loaded from an optional JSON file; command line flags override it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::game::GameConfig;
use crate::leaderboard::DEFAULT_ENDPOINT;

const APP_NAME: &str = "snake_engine";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Simulation rules
    #[serde(default)]
    pub game: GameConfig,

    /// Where scores and logs are written
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Name sent with leaderboard submissions; prefills the game over prompt
    #[serde(default)]
    pub player_name: Option<String>,

    #[serde(default = "default_endpoint")]
    pub leaderboard_endpoint: String,

    /// Allow Enter on the game over screen to submit
    #[serde(default = "default_true")]
    pub submit_enabled: bool,

    /// Directory holding eat.mp3, power-up.mp3, power-down.mp3, game-over.mp3
    #[serde(default)]
    pub sounds_dir: Option<PathBuf>,

    /// Ring the terminal bell for sound effects
    #[serde(default)]
    pub bell: bool,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_NAME)))
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            data_dir: default_data_dir(),
            player_name: None,
            leaderboard_endpoint: default_endpoint(),
            submit_enabled: true,
            sounds_dir: None,
            bell: false,
        }
    }
}

impl AppConfig {
    /// Load from `path`; missing fields fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: AppConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load `path` if given, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Whether a submission can be attempted at all
    pub fn can_submit(&self) -> bool {
        self.submit_enabled && !self.leaderboard_endpoint.trim().is_empty()
    }

    /// Configured player name, if it is not blank
    pub fn player_name(&self) -> Option<&str> {
        self.player_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
