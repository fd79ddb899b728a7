//! # Minimax Arena
//!
//! A Connect Four engine built around depth-limited minimax search with
//! alpha-beta pruning.
//!
//! ## Modules
//! - [`board`]: the gravity-constrained grid, seeds, and move simulation
//! - [`eval`]: heuristic scoring of unfinished positions
//! - [`search`]: the minimax engine, its configuration and statistics
//! - [`player`]: move-choosing strategies behind one trait
//! - [`game_controller`]: authoritative game state for a running match
//! - [`config`]: TOML configuration for the binaries
//! - [`error`]: error types shared across the crate
//!
//! ## Example
//! ```rust
//! use minimax::{Board, EvalWeights, Minimax, SearchConfig, Seed};
//!
//! let mut board = Board::standard();
//! let config = SearchConfig { depth: 4, seed: Some(1), ..SearchConfig::default() };
//! let mut engine = Minimax::new(config, EvalWeights::default());
//! let column = engine.choose_move(&mut board, Seed::Cross).unwrap();
//! assert!(board.is_legal(column));
//! assert_eq!(board, Board::standard());
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod eval;
pub mod game_controller;
pub mod player;
pub mod search;

pub use board::{Board, Placement, Seed};
pub use config::{AppConfig, PlayerKind};
pub use error::{BoardError, ConfigError, SearchError};
pub use eval::{evaluate, EvalWeights};
pub use game_controller::{GameController, GameStatus, MoveResult};
pub use player::{GreedyPlayer, MinimaxPlayer, Player, RandomPlayer};
pub use search::{Minimax, SearchConfig, SearchOutcome, SearchStatistics, WIN_SCORE};
