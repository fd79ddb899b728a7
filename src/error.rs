//! Error types for the board, the search engine and configuration loading.

use std::path::PathBuf;

use crate::board::Seed;

/// Invalid arguments passed to the board model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("column {column} is out of range (board has {columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },

    #[error("row {row} is out of range (board has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("cell ({row}, {column}) is not the drop position of its column")]
    GravityViolation { row: usize, column: usize },

    #[error("cell ({row}, {column}) is not the top seed of its column")]
    NotTopSeed { row: usize, column: usize },

    #[error("board dimensions {rows}x{columns} are not supported")]
    InvalidDimensions { rows: usize, columns: usize },

    #[error("failed to parse board: {0}")]
    Parse(String),
}

/// Reasons a search cannot produce a move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("no legal moves: the board is full")]
    NoLegalMoves,

    #[error("search depth must be at least 1 (got {0})")]
    InvalidDepth(u32),

    #[error("the game is already decided: {0} has four in a row")]
    AlreadyDecided(Seed),

    #[error("board error: {0}")]
    Board(#[from] BoardError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_display() {
        let err = BoardError::ColumnOutOfRange { column: 9, columns: 7 };
        assert_eq!(err.to_string(), "column 9 is out of range (board has 7 columns)");
        assert_eq!(BoardError::ColumnFull(3).to_string(), "column 3 is full");
    }

    #[test]
    fn test_search_error_display() {
        assert_eq!(SearchError::InvalidDepth(0).to_string(), "search depth must be at least 1 (got 0)");
        assert_eq!(
            SearchError::AlreadyDecided(Seed::Nought).to_string(),
            "the game is already decided: O has four in a row"
        );
        let wrapped: SearchError = BoardError::ColumnFull(2).into();
        assert_eq!(wrapped.to_string(), "board error: column 2 is full");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("search.depth must be between 1 and 16".to_string());
        assert_eq!(err.to_string(), "config validation error: search.depth must be between 1 and 16");
    }
}
