//! # Heuristic Position Evaluation
//!
//! Scores a board from the point of view of one seed. Used at search leaves
//! only; decided positions never reach here because the search returns
//! [`WIN_SCORE`] as soon as a move completes a line.
//!
//! The score is a sum over independent features:
//! - center control: seeds in the middle column
//! - every four-cell window (horizontal, vertical, both diagonals), scored
//!   by how many of our seeds and empty cells it holds
//! - opponent windows one seed short of a line, as an urgent-block penalty
//!
//! Windows overlap and each is counted on its own, so the result is an
//! approximation rather than an exact game value.

use crate::board::{Board, Seed, LINE};

/// Score of a finished win for the searching side. Losses score the negation.
pub const WIN_SCORE: i32 = 1_000_000;

/// Largest magnitude a heuristic score may take.
pub const HEURISTIC_LIMIT: i32 = WIN_SCORE - 1;

/// Static feature weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// Per seed in the center column (added for ours, subtracted for theirs)
    pub center: i32,
    /// Window with three of ours and one empty cell
    pub three: i32,
    /// Window with two of ours and two empty cells
    pub two: i32,
    /// Penalty for a window with three of theirs and one empty cell
    pub block: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        EvalWeights {
            center: 3,
            three: 100,
            two: 10,
            block: 200,
        }
    }
}

/// Cell tallies for one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct WindowCounts {
    ours: usize,
    theirs: usize,
    empty: usize,
}

fn count_window(cells: &[Option<Seed>], window: &[usize; LINE], us: Seed) -> WindowCounts {
    let mut counts = WindowCounts::default();
    for &idx in window {
        match cells[idx] {
            Some(seed) if seed == us => counts.ours += 1,
            Some(_) => counts.theirs += 1,
            None => counts.empty += 1,
        }
    }
    counts
}

fn score_window(counts: WindowCounts, weights: &EvalWeights) -> i64 {
    let mut score = 0i64;
    if counts.ours == 3 && counts.empty == 1 {
        score += i64::from(weights.three);
    } else if counts.ours == 2 && counts.empty == 2 {
        score += i64::from(weights.two);
    }
    if counts.theirs == 3 && counts.empty == 1 {
        score -= i64::from(weights.block);
    }
    score
}

/// Center-column control for `us`.
fn center_score(board: &Board, us: Seed, weights: &EvalWeights) -> i64 {
    let center = board.columns() / 2;
    board
        .cells()
        .iter()
        .skip(center)
        .step_by(board.columns())
        .map(|cell| match cell {
            Some(seed) if *seed == us => i64::from(weights.center),
            Some(_) => -i64::from(weights.center),
            None => 0,
        })
        .sum()
}

/// Evaluates `board` for `us`. Positive favours `us`.
///
/// The result always lies strictly between `-WIN_SCORE` and `WIN_SCORE`.
pub fn evaluate(board: &Board, us: Seed, weights: &EvalWeights) -> i32 {
    let cells = board.cells();
    let windows: i64 = grid_lines::windows::<LINE>(board.columns(), board.rows())
        .map(|window| score_window(count_window(cells, &window, us), weights))
        .sum();

    let total = center_score(board, us, weights) + windows;
    total.clamp(-i64::from(HEURISTIC_LIMIT), i64::from(HEURISTIC_LIMIT)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(text: &str) -> Board {
        Board::parse(text).unwrap()
    }

    #[test]
    fn test_empty_board_is_neutral() {
        let weights = EvalWeights::default();
        assert_eq!(evaluate(&Board::standard(), Seed::Cross, &weights), 0);
        assert_eq!(evaluate(&Board::standard(), Seed::Nought, &weights), 0);
    }

    #[test]
    fn test_center_control() {
        let b = board(
            ".......
             .......
             .......
             .......
             .......
             ...X...",
        );
        let weights = EvalWeights::default();
        assert_eq!(evaluate(&b, Seed::Cross, &weights), 3);
        assert_eq!(evaluate(&b, Seed::Nought, &weights), -3);
    }

    #[test]
    fn test_two_and_three_windows() {
        let weights = EvalWeights::default();
        let two = board(
            ".......
             .......
             .......
             .......
             .......
             XX.....",
        );
        assert_eq!(evaluate(&two, Seed::Cross, &weights), 10);

        let three = board(
            ".......
             .......
             .......
             .......
             .......
             XXX....",
        );
        // (0..4) holds three, (1..5) holds two
        assert_eq!(evaluate(&three, Seed::Cross, &weights), 110);
    }

    #[test]
    fn test_opponent_three_is_penalised() {
        let b = board(
            ".......
             .......
             .......
             .......
             .......
             OOO....",
        );
        assert_eq!(evaluate(&b, Seed::Cross, &EvalWeights::default()), -200);
    }

    #[test]
    fn test_vertical_and_diagonal_windows_count() {
        let weights = EvalWeights::default();
        let vertical = board(
            ".......
             .......
             .......
             X......
             X......
             X......",
        );
        // rows 2..6 of column 0 hold three with one empty; rows 1..5 hold two
        assert_eq!(evaluate(&vertical, Seed::Cross, &weights), 110);

        let rising = board(
            ".......
             .......
             .......
             ..X....
             .XO....
             XOO....",
        );
        let flat = board(
            ".......
             .......
             .......
             ..O....
             .OX....
             OXX....",
        );
        assert!(evaluate(&rising, Seed::Cross, &weights) > evaluate(&flat, Seed::Cross, &weights));
    }

    #[test]
    fn test_score_clamped_below_win() {
        let weights = EvalWeights {
            three: WIN_SCORE,
            ..EvalWeights::default()
        };
        let b = board(
            ".......
             .......
             .......
             .......
             .......
             XXX....",
        );
        assert_eq!(evaluate(&b, Seed::Cross, &weights), HEURISTIC_LIMIT);

        let huge = EvalWeights {
            block: i32::MAX,
            ..EvalWeights::default()
        };
        let lost = board(
            ".......
             .......
             .......
             .......
             .......
             OOO....",
        );
        assert_eq!(evaluate(&lost, Seed::Cross, &huge), -HEURISTIC_LIMIT);
    }
}
