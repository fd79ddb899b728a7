//! # Players
//!
//! A [`Player`] picks a column given a board snapshot and its own seed. The
//! minimax engine is one strategy; random and rules-based players sit beside
//! it and are mostly useful as sparring partners and for tests.

use rand::seq::IndexedRandom;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::debug;

use crate::board::{Board, Seed};
use crate::config::{AppConfig, PlayerKind};
use crate::error::SearchError;
use crate::eval::EvalWeights;
use crate::search::{playable_moves, Minimax, SearchConfig, SearchOutcome};

/// Something that can choose a move.
pub trait Player: Send {
    /// Short name for logs and the terminal UI.
    fn name(&self) -> &str;

    /// Picks a legal column for `seed` on `board`.
    fn choose_move(&mut self, board: &Board, seed: Seed) -> Result<usize, SearchError>;
}

/// Minimax with alpha-beta pruning.
pub struct MinimaxPlayer<R = Xoshiro256PlusPlus> {
    engine: Minimax<R>,
    last_outcome: Option<SearchOutcome>,
}

impl MinimaxPlayer {
    pub fn new(config: SearchConfig, weights: EvalWeights) -> Self {
        MinimaxPlayer::from_engine(Minimax::new(config, weights))
    }
}

impl<R: RngCore + Send> MinimaxPlayer<R> {
    pub fn from_engine(engine: Minimax<R>) -> Self {
        MinimaxPlayer {
            engine,
            last_outcome: None,
        }
    }

    /// Score and statistics of the most recent search.
    pub fn last_outcome(&self) -> Option<&SearchOutcome> {
        self.last_outcome.as_ref()
    }
}

impl<R: RngCore + Send> Player for MinimaxPlayer<R> {
    fn name(&self) -> &str {
        "minimax"
    }

    fn choose_move(&mut self, board: &Board, seed: Seed) -> Result<usize, SearchError> {
        let mut scratch = board.clone();
        let outcome = self.engine.search(&mut scratch, seed)?;
        let column = outcome.column;
        self.last_outcome = Some(outcome);
        Ok(column)
    }
}

/// Plays a uniformly random legal column.
pub struct RandomPlayer<R = Xoshiro256PlusPlus> {
    rng: R,
}

impl RandomPlayer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
        };
        RandomPlayer { rng }
    }
}

impl<R: RngCore + Send> Player for RandomPlayer<R> {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_move(&mut self, board: &Board, _seed: Seed) -> Result<usize, SearchError> {
        let moves = playable_moves(board)?;
        moves.choose(&mut self.rng).copied().ok_or(SearchError::NoLegalMoves)
    }
}

/// One-ply rules: win if possible, otherwise block the opponent's immediate
/// win, otherwise take the most central column.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyPlayer;

impl GreedyPlayer {
    fn completing_move(board: &mut Board, moves: &[usize], seed: Seed) -> Result<Option<usize>, SearchError> {
        for &column in moves {
            if board.drop_seed(column, seed)?.is_win() {
                return Ok(Some(column));
            }
        }
        Ok(None)
    }
}

impl Player for GreedyPlayer {
    fn name(&self) -> &str {
        "greedy"
    }

    fn choose_move(&mut self, board: &Board, seed: Seed) -> Result<usize, SearchError> {
        let moves = playable_moves(board)?;
        let mut scratch = board.clone();

        if let Some(column) = Self::completing_move(&mut scratch, &moves, seed)? {
            debug!(column, "greedy player completes a line");
            return Ok(column);
        }
        if let Some(column) = Self::completing_move(&mut scratch, &moves, seed.opponent())? {
            debug!(column, "greedy player blocks");
            return Ok(column);
        }
        Ok(moves[0])
    }
}

/// Builds the computer player for `kind`, or `None` for a human seat.
///
/// `offset` perturbs a fixed seed so two computer seats seeded from the same
/// config do not mirror each other.
pub fn from_config(kind: PlayerKind, config: &AppConfig, offset: u64) -> Option<Box<dyn Player>> {
    let mut search = config.search;
    search.seed = search.seed.map(|s| s.wrapping_add(offset));
    match kind {
        PlayerKind::Human => None,
        PlayerKind::Minimax => Some(Box::new(MinimaxPlayer::new(search, config.eval))),
        PlayerKind::Random => Some(Box::new(RandomPlayer::new(search.seed))),
        PlayerKind::Greedy => Some(Box::new(GreedyPlayer)),
    }
}
