//! # Game Controller Module - Central Game State Management
//!
//! The `GameController` owns the authoritative board for one game. It is the
//! "external collaborator" of the search engine: it knows whose turn it is,
//! validates and applies moves, detects wins and draws, and hands out board
//! snapshots for players to search on.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                GameController                │
//! │  authoritative Board + to_move + history     │
//! └──────────────┬──────────────────┬────────────┘
//!                │ snapshot         │ column
//!                ▼                  │
//!         ┌─────────────┐           │
//!         │   Player    │───────────┘
//!         └─────────────┘
//! ```

use std::time::SystemTime;

use tracing::info;

use crate::board::{center_order, Board, Seed};

/// Result of attempting to apply a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    /// Move was successfully applied
    Success {
        /// Column played
        column: usize,
        /// Row the seed landed in
        row: usize,
        /// Seed that was played
        seed: Seed,
        /// Whether the game is now over
        game_over: bool,
        /// Winner if the game is over (None for a draw)
        winner: Option<Seed>,
    },
    /// Move was rejected as invalid
    Invalid {
        /// Reason the move was rejected
        reason: MoveValidationError,
    },
    /// Game is already over, no more moves allowed
    GameOver,
}

/// Errors that can occur during move validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveValidationError {
    /// Column index is not on the board
    ColumnOutOfRange(usize),
    /// Column has no empty cell left
    ColumnFull(usize),
    /// The game is already in a terminal state
    GameAlreadyOver,
}

impl std::fmt::Display for MoveValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveValidationError::ColumnOutOfRange(c) => write!(f, "Column {} is not on the board", c),
            MoveValidationError::ColumnFull(c) => write!(f, "Column {} is full", c),
            MoveValidationError::GameAlreadyOver => write!(f, "Game is already over"),
        }
    }
}

impl std::error::Error for MoveValidationError {}

/// A single entry in the move history
#[derive(Debug, Clone)]
pub struct MoveHistoryEntry {
    /// When the move was made
    pub timestamp: SystemTime,
    /// Seed that was played
    pub seed: Seed,
    pub column: usize,
    pub row: usize,
    /// Move number (1-indexed)
    pub move_number: usize,
}

impl MoveHistoryEntry {
    /// Create a new move history entry
    pub fn new(seed: Seed, column: usize, row: usize, move_number: usize) -> Self {
        Self {
            timestamp: SystemTime::now(),
            seed,
            column,
            row,
            move_number,
        }
    }
}

/// Current game status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Game is still in progress
    InProgress,
    /// Game ended with a winner
    Win(Seed),
    /// Game ended in a draw
    Draw,
}

impl GameStatus {
    /// Check if the game is over
    pub fn is_game_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Status of a position that may already be decided.
    fn of(board: &Board) -> GameStatus {
        match board.winner() {
            Some(seed) => GameStatus::Win(seed),
            None if board.is_full() => GameStatus::Draw,
            None => GameStatus::InProgress,
        }
    }
}

/// The central game controller that owns the authoritative board
///
/// # Usage
/// ```rust
/// use minimax::board::{Board, Seed};
/// use minimax::game_controller::{GameController, MoveResult};
///
/// let mut controller = GameController::new(Board::standard(), Seed::Cross);
/// match controller.try_make_move(3) {
///     MoveResult::Success { row, game_over, .. } => {
///         assert_eq!(row, 5);
///         assert!(!game_over);
///     }
///     other => panic!("unexpected {:?}", other),
/// }
/// assert_eq!(controller.to_move(), Seed::Nought);
/// ```
#[derive(Debug, Clone)]
pub struct GameController {
    /// The authoritative board
    board: Board,
    /// Seed that plays next
    to_move: Seed,
    /// Seed that moved first, restored by `reset`
    first: Seed,
    /// Complete history of moves made
    move_history: Vec<MoveHistoryEntry>,
    /// Current game status
    status: GameStatus,
}

impl GameController {
    /// Create a new game controller on `board` with `first` to move.
    ///
    /// The board may be a position in progress; its status is derived from it.
    pub fn new(board: Board, first: Seed) -> Self {
        let status = GameStatus::of(&board);
        Self {
            board,
            to_move: first,
            first,
            move_history: Vec::new(),
            status,
        }
    }

    /// Validate a move without applying it
    pub fn validate_move(&self, column: usize) -> Result<(), MoveValidationError> {
        if self.status.is_game_over() {
            return Err(MoveValidationError::GameAlreadyOver);
        }
        if column >= self.board.columns() {
            return Err(MoveValidationError::ColumnOutOfRange(column));
        }
        if !self.board.is_legal(column) {
            return Err(MoveValidationError::ColumnFull(column));
        }
        Ok(())
    }

    /// Attempt to drop the current player's seed into `column`
    pub fn try_make_move(&mut self, column: usize) -> MoveResult {
        if self.status.is_game_over() {
            return MoveResult::GameOver;
        }
        if let Err(reason) = self.validate_move(column) {
            return MoveResult::Invalid { reason };
        }

        let seed = self.to_move;
        let placed = match self.board.drop_seed(column, seed) {
            Ok(placed) => placed,
            Err(_) => {
                return MoveResult::Invalid {
                    reason: MoveValidationError::ColumnFull(column),
                }
            }
        };
        let won = placed.is_win();
        let (row, _) = placed.commit();

        let move_number = self.move_history.len() + 1;
        self.move_history.push(MoveHistoryEntry::new(seed, column, row, move_number));
        self.to_move = seed.opponent();

        self.status = if won {
            GameStatus::Win(seed)
        } else if self.board.is_full() {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        };

        let winner = match self.status {
            GameStatus::Win(w) => Some(w),
            _ => None,
        };
        if self.status.is_game_over() {
            info!(move_number, winner = ?winner, "game over");
        }

        MoveResult::Success {
            column,
            row,
            seed,
            game_over: self.status.is_game_over(),
            winner,
        }
    }

    /// Get a clone of the board for a player to search
    pub fn get_state_for_search(&self) -> Board {
        self.board.clone()
    }

    /// The authoritative board, for rendering
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Seed that plays next
    pub fn to_move(&self) -> Seed {
        self.to_move
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    pub fn winner(&self) -> Option<Seed> {
        match self.status {
            GameStatus::Win(w) => Some(w),
            _ => None,
        }
    }

    pub fn move_history(&self) -> &[MoveHistoryEntry] {
        &self.move_history
    }

    pub fn move_count(&self) -> usize {
        self.move_history.len()
    }

    pub fn last_move(&self) -> Option<&MoveHistoryEntry> {
        self.move_history.last()
    }

    /// Legal columns for the current player, center first
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.status.is_game_over() {
            Vec::new()
        } else {
            self.board.legal_moves(&center_order(self.board.columns()))
        }
    }

    /// Take back the last move
    pub fn undo(&mut self) -> Option<MoveHistoryEntry> {
        let entry = self.move_history.pop()?;
        if self.board.clear(entry.row, entry.column).is_err() {
            self.move_history.push(entry);
            return None;
        }
        self.to_move = entry.seed;
        self.status = GameStatus::of(&self.board);
        Some(entry)
    }

    /// Start over on `board` with the original first player
    pub fn reset(&mut self, board: Board) {
        self.status = GameStatus::of(&board);
        self.board = board;
        self.to_move = self.first;
        self.move_history.clear();
    }

    /// Move list as text, one move per line, followed by the result
    pub fn format_history(&self) -> String {
        if self.move_history.is_empty() {
            return String::from("No moves made yet.");
        }

        let mut output = String::from("=== Connect Four Game History ===\n\n");
        let started = self.move_history[0].timestamp;
        for entry in &self.move_history {
            // Clock steps backwards read as zero
            let offset = entry.timestamp.duration_since(started).unwrap_or_default();
            output.push_str(&format!(
                "{}. {} - column {} (+{:.1}s)\n",
                entry.move_number,
                entry.seed,
                entry.column,
                offset.as_secs_f64()
            ));
        }

        match self.status {
            GameStatus::Win(winner) => output.push_str(&format!("\nResult: {} wins!\n", winner)),
            GameStatus::Draw => output.push_str("\nResult: Draw\n"),
            GameStatus::InProgress => {
                output.push_str(&format!("\n(Game in progress - {} to move)\n", self.to_move))
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(controller: &mut GameController, columns: &[usize]) {
        for &c in columns {
            assert!(matches!(controller.try_make_move(c), MoveResult::Success { .. }));
        }
    }

    #[test]
    fn test_valid_move() {
        let mut controller = GameController::new(Board::standard(), Seed::Cross);
        match controller.try_make_move(3) {
            MoveResult::Success { seed, row, game_over, .. } => {
                assert_eq!(seed, Seed::Cross);
                assert_eq!(row, 5);
                assert!(!game_over);
            }
            other => panic!("Expected successful move, got {:?}", other),
        }
        assert_eq!(controller.to_move(), Seed::Nought);
    }

    #[test]
    fn test_invalid_moves() {
        let mut controller = GameController::new(Board::new(2, 3).unwrap(), Seed::Cross);
        assert_eq!(
            controller.try_make_move(3),
            MoveResult::Invalid {
                reason: MoveValidationError::ColumnOutOfRange(3)
            }
        );
        play(&mut controller, &[0, 0]);
        assert_eq!(
            controller.try_make_move(0),
            MoveResult::Invalid {
                reason: MoveValidationError::ColumnFull(0)
            }
        );
        assert_eq!(controller.to_move(), Seed::Cross);
    }

    #[test]
    fn test_win_ends_game() {
        let mut controller = GameController::new(Board::standard(), Seed::Cross);
        play(&mut controller, &[0, 0, 1, 1, 2, 2]);
        match controller.try_make_move(3) {
            MoveResult::Success { game_over, winner, .. } => {
                assert!(game_over);
                assert_eq!(winner, Some(Seed::Cross));
            }
            other => panic!("Expected winning move, got {:?}", other),
        }
        assert_eq!(controller.status(), GameStatus::Win(Seed::Cross));
        assert_eq!(controller.try_make_move(4), MoveResult::GameOver);
        assert_eq!(controller.validate_move(4), Err(MoveValidationError::GameAlreadyOver));
        assert!(controller.legal_moves().is_empty());
    }

    #[test]
    fn test_draw_on_full_board() {
        let mut controller = GameController::new(Board::new(2, 2).unwrap(), Seed::Cross);
        play(&mut controller, &[0, 1, 0]);
        match controller.try_make_move(1) {
            MoveResult::Success { game_over, winner, .. } => {
                assert!(game_over);
                assert_eq!(winner, None);
            }
            other => panic!("Expected final move, got {:?}", other),
        }
        assert_eq!(controller.status(), GameStatus::Draw);
    }

    #[test]
    fn test_move_history_and_undo() {
        let mut controller = GameController::new(Board::standard(), Seed::Cross);
        play(&mut controller, &[3, 4]);
        assert_eq!(controller.move_count(), 2);
        assert_eq!(controller.move_history()[0].seed, Seed::Cross);
        assert_eq!(controller.move_history()[1].seed, Seed::Nought);
        assert_eq!(controller.last_move().map(|m| m.column), Some(4));

        let undone = controller.undo().unwrap();
        assert_eq!(undone.column, 4);
        assert_eq!(controller.to_move(), Seed::Nought);
        assert_eq!(controller.board().get(5, 4), Ok(None));
    }

    #[test]
    fn test_reset() {
        let mut controller = GameController::new(Board::standard(), Seed::Nought);
        play(&mut controller, &[3]);
        controller.reset(Board::standard());
        assert_eq!(controller.move_count(), 0);
        assert_eq!(controller.to_move(), Seed::Nought);
        assert!(matches!(controller.status, GameStatus::InProgress));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let controller = GameController::new(Board::standard(), Seed::Cross);
        let mut snapshot = controller.get_state_for_search();
        snapshot.drop_seed(3, Seed::Cross).unwrap().commit();
        assert_eq!(controller.board(), &Board::standard());
    }

    #[test]
    fn test_format_history() {
        let mut controller = GameController::new(Board::standard(), Seed::Cross);
        play(&mut controller, &[3]);
        let history = controller.format_history();
        assert!(history.contains("Connect Four Game History"));
        assert!(history.contains("1. X - column 3 (+0.0s)"));
        assert!(history.contains("O to move"));
    }
}
