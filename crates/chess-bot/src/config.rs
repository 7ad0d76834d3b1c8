//! Configuration file loading for the computer player.
//!
//! Every field has a default, so an empty or missing file yields a working
//! setup: random play until a skill level is chosen, then an external
//! `stockfish` with the masters opening book in front of built-in search.

use chess_openings::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which strategy plays once the skill level is non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Opponent {
    /// External UCI engine, random move if it fails.
    #[default]
    Engine,
    /// One-ply material grab.
    Greedy,
    /// Opening book, then built-in minimax.
    Minimax,
}

/// External engine process settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine executable, looked up on `PATH` if not absolute.
    #[serde(default = "default_engine_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
    /// Search depth sent with every `go`.
    #[serde(default = "default_engine_depth")]
    pub depth: u32,
    /// Limit for each exchange with the engine.
    #[serde(default = "default_engine_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_engine_path() -> PathBuf {
    PathBuf::from("stockfish")
}

fn default_engine_depth() -> u32 {
    5
}

fn default_engine_timeout_ms() -> u64 {
    10_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: default_engine_path(),
            args: Vec::new(),
            depth: default_engine_depth(),
            timeout_ms: default_engine_timeout_ms(),
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Opening explorer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningBookConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_book_timeout_ms")]
    pub timeout_ms: u64,
    /// Bearer token, if the explorer requires one.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_book_timeout_ms() -> u64 {
    3_000
}

impl Default for OpeningBookConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            endpoint: default_endpoint(),
            timeout_ms: default_book_timeout_ms(),
            token: None,
        }
    }
}

impl OpeningBookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Computer player configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Below zero the computer plays random moves.
    #[serde(default = "default_skill_level")]
    pub skill_level: i32,
    #[serde(default)]
    pub opponent: Opponent,
    #[serde(default = "default_minimax_depth")]
    pub minimax_depth: u32,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub opening_book: OpeningBookConfig,
}

fn default_skill_level() -> i32 {
    -1
}

fn default_minimax_depth() -> u32 {
    chess_engine::search::DEFAULT_DEPTH
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            skill_level: default_skill_level(),
            opponent: Opponent::default(),
            minimax_depth: default_minimax_depth(),
            engine: EngineConfig::default(),
            opening_book: OpeningBookConfig::default(),
        }
    }
}

impl BotConfig {
    /// Loads the configuration from `path`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file exists but cannot be read,
    /// or [`ConfigError::Parse`] if the file contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default configuration file name.
    pub fn config_path() -> PathBuf {
        PathBuf::from("bot.toml")
    }
}
