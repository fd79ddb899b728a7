//! # Minimax Search with Alpha-Beta Pruning
//!
//! Depth-limited minimax over column drops. All recursion shares one board:
//! each simulated move is a [`Placement`] guard, so the board is back in its
//! original state whenever a call returns, on every path including the
//! immediate-win short-circuit and errors.
//!
//! ## Per node
//! 1. Legal columns, center first.
//! 2. No moves left or depth exhausted: static evaluation for the AI seed.
//! 3. For each move: drop the seed; a completed line returns `±WIN_SCORE`
//!    at once, otherwise recurse with the other seed and one less ply.
//! 4. Maximize on the AI's turns, minimize on the opponent's, and stop the
//!    loop once `alpha >= beta`.
//!
//! ## Root
//! Every root move is searched with alpha one below the best score so far,
//! so each move tied with the best gets an exact score. With `randomize` on,
//! the engine picks uniformly among the tied moves; otherwise the most
//! central one wins.
//!
//! ## Root parallelism
//! With `threads > 1` the root moves are spread over a rayon pool. Each
//! worker searches on its own board clone. The best proven root score is
//! shared as alpha; a worker's result only counts as exact when it beats the
//! window it was searched with.

use std::sync::atomic::{AtomicI32, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::seq::IndexedRandom;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace, warn};

use crate::board::{center_order, Board, Placement, Seed};
use crate::error::{BoardError, SearchError};
use crate::eval::{evaluate, EvalWeights};

pub use crate::eval::WIN_SCORE;

/// Bound wider than any reachable score.
const INF: i32 = WIN_SCORE + 1;

/// Deepest search the configuration accepts.
pub const MAX_DEPTH: u32 = 16;

/// Search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies to look ahead, at least 1
    pub depth: u32,
    /// Worker threads for the root moves; 1 searches sequentially
    pub threads: usize,
    /// Pick at random among root moves sharing the best score
    pub randomize: bool,
    /// Fixed seed for the random source; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: 6,
            threads: 1,
            randomize: true,
            seed: None,
        }
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Nodes entered, root included
    pub total_nodes: u64,
    /// Static evaluations performed
    pub leaf_evaluations: u64,
    /// Move loops abandoned on `alpha >= beta`
    pub cutoffs: u64,
    /// Simulated moves that completed a line
    pub decisive_lines: u64,
    /// Wall time of the whole search
    pub elapsed: Duration,
}

impl SearchStatistics {
    /// Combines counters from another worker. Elapsed time is left alone.
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.total_nodes += other.total_nodes;
        self.leaf_evaluations += other.leaf_evaluations;
        self.cutoffs += other.cutoffs;
        self.decisive_lines += other.decisive_lines;
    }

    pub fn nodes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_nodes as f64 / secs
        } else {
            0.0
        }
    }
}

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Chosen column
    pub column: usize,
    /// Minimax score of `column` at `depth`, from the AI's point of view
    pub score: i32,
    /// Every root column sharing `score`, most central first
    pub tied: Vec<usize>,
    pub depth: u32,
    pub stats: SearchStatistics,
}

impl SearchOutcome {
    /// True when the score is a forced win or loss rather than a heuristic.
    pub fn is_decisive(&self) -> bool {
        self.score.abs() >= WIN_SCORE
    }
}

/// Columns the side to move may play, center first.
///
/// Fails when the board is full or already holds a line of four.
pub fn playable_moves(board: &Board) -> Result<Vec<usize>, SearchError> {
    if let Some(winner) = board.winner() {
        return Err(SearchError::AlreadyDecided(winner));
    }
    let moves = board.legal_moves(&center_order(board.columns()));
    if moves.is_empty() {
        return Err(SearchError::NoLegalMoves);
    }
    Ok(moves)
}

/// Columns in `moves` where `seed` completes a line right away.
fn winning_moves(board: &mut Board, seed: Seed, moves: &[usize]) -> Result<Vec<usize>, BoardError> {
    let mut wins = Vec::new();
    for &column in moves {
        if board.drop_seed(column, seed)?.is_win() {
            wins.push(column);
        }
    }
    Ok(wins)
}

/// Best root score and the columns that reach it, in search order.
type RootScores = (i32, Vec<usize>);

/// State carried through one recursive search.
struct Context<'a> {
    ai: Seed,
    weights: &'a EvalWeights,
    order: &'a [usize],
    stats: SearchStatistics,
}

impl Context<'_> {
    fn minimax(
        &mut self,
        board: &mut Placement<'_>,
        depth: u32,
        to_move: Seed,
        mut alpha: i32,
        mut beta: i32,
    ) -> Result<i32, BoardError> {
        self.stats.total_nodes += 1;

        let moves = board.legal_moves(self.order);
        if moves.is_empty() || depth == 0 {
            self.stats.leaf_evaluations += 1;
            return Ok(evaluate(board, self.ai, self.weights));
        }

        let maximizing = to_move == self.ai;
        let mut best = if maximizing { -INF } else { INF };

        for column in moves {
            let mut child = board.drop_seed(column, to_move)?;
            if child.is_win() {
                self.stats.decisive_lines += 1;
                return Ok(if maximizing { WIN_SCORE } else { -WIN_SCORE });
            }

            let score = self.minimax(&mut child, depth - 1, to_move.opponent(), alpha, beta)?;
            drop(child);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }

            if alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }

        Ok(best)
    }

    /// Searches every root move for the AI. None of them may win at once.
    fn root(&mut self, board: &mut Board, depth: u32, moves: &[usize]) -> Result<RootScores, BoardError> {
        let mut best = -INF;
        let mut tied = Vec::new();

        for &column in moves {
            let mut child = board.drop_seed(column, self.ai)?;
            let floor = best - 1;
            let score = self.minimax(&mut child, depth - 1, self.ai.opponent(), floor, INF)?;
            drop(child);
            trace!(column, score, "root move searched");

            if score > best {
                best = score;
                tied.clear();
                tied.push(column);
            } else if score == best {
                tied.push(column);
            }
        }

        Ok((best, tied))
    }
}

/// One root move searched by a worker.
#[derive(Debug, Clone, Copy)]
struct RootResult {
    column: usize,
    score: i32,
    exact: bool,
}

/// Minimax engine with alpha-beta pruning.
///
/// The random source is injected so tests can fix it; by default it is a
/// [`Xoshiro256PlusPlus`].
pub struct Minimax<R = Xoshiro256PlusPlus> {
    config: SearchConfig,
    weights: EvalWeights,
    rng: R,
    /// Present only when `threads > 1`
    pool: Option<ThreadPool>,
}

impl Minimax<Xoshiro256PlusPlus> {
    /// Creates an engine seeded from `config.seed`, or from the OS when unset.
    pub fn new(config: SearchConfig, weights: EvalWeights) -> Self {
        let rng = match config.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
        };
        Self::with_rng(config, weights, rng)
    }
}

impl<R: RngCore + Send> Minimax<R> {
    /// Creates an engine breaking ties with `rng`.
    pub fn with_rng(config: SearchConfig, weights: EvalWeights, rng: R) -> Self {
        let pool = if config.threads > 1 {
            match ThreadPoolBuilder::new().num_threads(config.threads).build() {
                Ok(pool) => Some(pool),
                Err(e) => {
                    warn!(threads = config.threads, error = %e, "failed to build search pool, searching sequentially");
                    None
                }
            }
        } else {
            None
        };

        Minimax {
            config,
            weights,
            rng,
            pool,
        }
    }

    /// Changes the look-ahead depth for later searches.
    pub fn set_depth(&mut self, depth: u32) {
        self.config.depth = depth;
    }

    /// Picks a column for `ai` to play.
    ///
    /// The board is searched in place and is unchanged when this returns.
    pub fn choose_move(&mut self, board: &mut Board, ai: Seed) -> Result<usize, SearchError> {
        Ok(self.search(board, ai)?.column)
    }

    /// Like [`choose_move`](Self::choose_move), also returning the score,
    /// the tied columns and search statistics.
    pub fn search(&mut self, board: &mut Board, ai: Seed) -> Result<SearchOutcome, SearchError> {
        let depth = self.config.depth;
        if depth == 0 {
            return Err(SearchError::InvalidDepth(depth));
        }
        let moves = playable_moves(board)?;

        let start = Instant::now();
        let order = center_order(board.columns());
        let mut stats = SearchStatistics {
            total_nodes: 1,
            ..SearchStatistics::default()
        };

        // Immediate wins decide the root without searching anything else.
        let wins = winning_moves(board, ai, &moves)?;
        let (score, tied) = if !wins.is_empty() {
            stats.decisive_lines += wins.len() as u64;
            (WIN_SCORE, wins)
        } else if let Some(pool) = &self.pool {
            let (scores, worker_stats) = search_parallel(pool, board, ai, depth, &order, &moves, &self.weights)?;
            stats.merge(&worker_stats);
            scores
        } else {
            let mut ctx = Context {
                ai,
                weights: &self.weights,
                order: &order,
                stats: SearchStatistics::default(),
            };
            let scores = ctx.root(board, depth, &moves)?;
            stats.merge(&ctx.stats);
            scores
        };
        stats.elapsed = start.elapsed();

        let pick = if self.config.randomize {
            tied.choose(&mut self.rng)
        } else {
            tied.first()
        };
        let column = pick.copied().ok_or(SearchError::NoLegalMoves)?;
        debug!(
            seed = %ai,
            column,
            score,
            ties = tied.len(),
            depth,
            nodes = stats.total_nodes,
            cutoffs = stats.cutoffs,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "search finished"
        );

        Ok(SearchOutcome {
            column,
            score,
            tied,
            depth,
            stats,
        })
    }
}

/// Searches every root move on `pool`, one board clone per move.
fn search_parallel(
    pool: &ThreadPool,
    board: &Board,
    ai: Seed,
    depth: u32,
    order: &[usize],
    moves: &[usize],
    weights: &EvalWeights,
) -> Result<(RootScores, SearchStatistics), SearchError> {
    let shared_alpha = AtomicI32::new(-INF);
    let merged = Mutex::new(SearchStatistics::default());

    let results: Vec<RootResult> = pool.install(|| {
        moves
            .par_iter()
            .map(|&column| -> Result<RootResult, BoardError> {
                let mut local = board.clone();
                let mut ctx = Context {
                    ai,
                    weights,
                    order,
                    stats: SearchStatistics::default(),
                };

                let floor = shared_alpha.load(Ordering::Acquire) - 1;
                let mut child = local.drop_seed(column, ai)?;
                let score = ctx.minimax(&mut child, depth - 1, ai.opponent(), floor, INF)?;
                drop(child);

                let exact = score > floor;
                if exact {
                    shared_alpha.fetch_max(score, Ordering::AcqRel);
                }
                merged.lock().merge(&ctx.stats);
                trace!(column, score, exact, "root move searched");

                Ok(RootResult { column, score, exact })
            })
            .collect::<Result<Vec<_>, _>>()
    })?;

    let best = results
        .iter()
        .filter(|r| r.exact)
        .map(|r| r.score)
        .max()
        .ok_or(SearchError::NoLegalMoves)?;
    let tied = results
        .iter()
        .filter(|r| r.exact && r.score == best)
        .map(|r| r.column)
        .collect();

    Ok(((best, tied), merged.into_inner()))
}
