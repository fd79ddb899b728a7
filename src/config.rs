//! # Configuration
//!
//! `AppConfig` is read from a TOML file with one table per concern:
//! `[board]`, `[search]`, `[eval]` and `[players]`. Every key is optional and
//! falls back to its default; the binaries then apply command-line overrides
//! and call [`AppConfig::validate`].

use std::path::Path;

use tracing::warn;

use crate::board::{Board, MAX_DIMENSION};
use crate::error::{BoardError, ConfigError};
use crate::eval::EvalWeights;
use crate::search::{SearchConfig, MAX_DEPTH};

/// Largest accepted value for any single evaluation weight.
const MAX_WEIGHT: i32 = 10_000;

/// Who sits in a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// Moves typed at the terminal
    Human,
    /// Alpha-beta search
    Minimax,
    /// Uniformly random legal column
    Random,
    /// Win, else block, else center
    Greedy,
}

/// Board dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: usize,
    pub columns: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig { rows: 6, columns: 7 }
    }
}

impl BoardConfig {
    /// An empty board of these dimensions.
    pub fn build(&self) -> Result<Board, BoardError> {
        Board::new(self.rows, self.columns)
    }
}

/// Seat assignments. Cross moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayersConfig {
    pub cross: PlayerKind,
    pub nought: PlayerKind,
}

impl Default for PlayersConfig {
    fn default() -> Self {
        PlayersConfig {
            cross: PlayerKind::Human,
            nought: PlayerKind::Minimax,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub search: SearchConfig,
    pub eval: EvalWeights,
    pub players: PlayersConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.board;
        if b.rows == 0 || b.columns == 0 || b.rows > MAX_DIMENSION || b.columns > MAX_DIMENSION {
            return Err(ConfigError::Validation(format!(
                "board dimensions must be between 1 and {MAX_DIMENSION} (got {}x{})",
                b.rows, b.columns
            )));
        }
        if self.search.depth == 0 || self.search.depth > MAX_DEPTH {
            return Err(ConfigError::Validation(format!(
                "search.depth must be between 1 and {MAX_DEPTH}"
            )));
        }
        if self.search.threads == 0 {
            return Err(ConfigError::Validation("search.threads must be > 0".into()));
        }

        let weights = [
            ("center", self.eval.center),
            ("three", self.eval.three),
            ("two", self.eval.two),
            ("block", self.eval.block),
        ];
        for (name, value) in weights {
            if !(0..=MAX_WEIGHT).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "eval.{name} must be between 0 and {MAX_WEIGHT}"
                )));
            }
        }
        Ok(())
    }
}
