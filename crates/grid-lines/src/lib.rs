#![cfg_attr(not(test), no_std)]

//! Line scanning over flat, row-major grids.
//!
//! Row 0 is the top row. Cells are addressed as `row * width + col`. Nothing
//! here knows about seeds or players: callers pass the cell slice and the
//! value they are looking for.

/// One of the four line directions on a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left to right along a row.
    Horizontal,
    /// Top to bottom along a column.
    Vertical,
    /// Bottom-left to top-right (`/`).
    Rising,
    /// Top-left to bottom-right (`\`).
    Falling,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::Rising,
        Direction::Falling,
    ];

    /// Row and column increments for one step along this direction.
    pub const fn step(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::Rising => (-1, 1),
            Direction::Falling => (1, 1),
        }
    }
}

/// Index of the cell `k` steps from `(row, col)` along `dir`, if it is on the grid.
#[inline]
fn offset(width: usize, height: usize, row: usize, col: usize, dir: Direction, k: isize) -> Option<usize> {
    let (dr, dc) = dir.step();
    let r = row as isize + dr * k;
    let c = col as isize + dc * k;
    if r < 0 || c < 0 || r >= height as isize || c >= width as isize {
        None
    } else {
        Some(r as usize * width + c as usize)
    }
}

/// Checks whether the cell at `(row, col)` sits on a run of `line` consecutive
/// cells equal to `target`.
///
/// Only the four lines through `(row, col)` are scanned, at most `line - 1`
/// cells each way, so the cost does not depend on the grid size. The count
/// resets on every non-matching cell; cells beyond the grid edge are skipped
/// without being read.
pub fn run_through<T: PartialEq>(
    cells: &[T],
    width: usize,
    height: usize,
    row: usize,
    col: usize,
    target: &T,
    line: usize,
) -> bool {
    if line == 0 {
        return false;
    }
    let reach = (line - 1) as isize;

    Direction::ALL.iter().any(|&dir| {
        let mut count = 0;
        for k in -reach..=reach {
            match offset(width, height, row, col, dir, k) {
                Some(idx) if cells.get(idx) == Some(target) => {
                    count += 1;
                    if count >= line {
                        return true;
                    }
                }
                _ => count = 0,
            }
        }
        false
    })
}

/// Every `(row, col, direction)` from which a straight window of `len` cells
/// fits entirely on a `width` x `height` grid.
pub fn window_starts(width: usize, height: usize, len: usize) -> impl Iterator<Item = (usize, usize, Direction)> {
    Direction::ALL
        .into_iter()
        .flat_map(move |dir| (0..height).flat_map(move |row| (0..width).map(move |col| (row, col, dir))))
        .filter(move |&(row, col, dir)| len > 0 && offset(width, height, row, col, dir, len as isize - 1).is_some())
}

/// Cell indices of every straight `N`-cell window on the grid, in all four
/// directions. Windows overlap; each one is yielded once.
pub fn windows<const N: usize>(width: usize, height: usize) -> impl Iterator<Item = [usize; N]> {
    window_starts(width, height, N).map(move |(row, col, dir)| {
        let (dr, dc) = dir.step();
        core::array::from_fn(|k| {
            let r = (row as isize + dr * k as isize) as usize;
            let c = (col as isize + dc * k as isize) as usize;
            r * width + c
        })
    })
}

/// Scans the whole grid for `line` consecutive cells equal to `target`.
pub fn has_line<T: PartialEq>(cells: &[T], width: usize, height: usize, target: &T, line: usize) -> bool {
    if line == 0 || cells.len() < width * height {
        return false;
    }
    window_starts(width, height, line).any(|(row, col, dir)| {
        (0..line as isize).all(|k| match offset(width, height, row, col, dir, k) {
            Some(idx) => cells[idx] == *target,
            None => false,
        })
    })
}
