//! # Connect Four Board Model
//!
//! A fixed-size grid of cells, each empty or holding one player's seed.
//! Seeds are dropped into columns and fall to the lowest empty row, so within
//! any column the occupied cells are contiguous from the bottom up. Every
//! mutation goes through a gravity check; the board never holds a floating
//! seed.
//!
//! ## Layout
//! - Row 0 is the top row, row `rows - 1` the bottom row
//! - Cells are stored row-major in a flat vector
//! - A column is a legal move while its top cell (row 0) is empty
//!
//! ## Simulating moves
//! The search engine explores moves on one shared board. [`Board::drop_seed`]
//! returns a [`Placement`] guard that derefs to the board and clears the cell
//! again when it goes out of scope, so every exit path restores the board.

use crate::error::BoardError;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Number of same-seed cells in a line that wins the game.
pub const LINE: usize = 4;

/// Standard Connect Four height.
pub const DEFAULT_ROWS: usize = 6;

/// Standard Connect Four width.
pub const DEFAULT_COLUMNS: usize = 7;

/// Largest supported board side.
pub const MAX_DIMENSION: usize = 64;

/// A player's mark.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Seed {
    /// Moves first, drawn as `X`
    Cross,
    /// Drawn as `O`
    Nought,
}

impl Seed {
    /// The other player's seed.
    pub fn opponent(self) -> Seed {
        match self {
            Seed::Cross => Seed::Nought,
            Seed::Nought => Seed::Cross,
        }
    }

    /// Single-character board symbol.
    pub fn symbol(self) -> char {
        match self {
            Seed::Cross => 'X',
            Seed::Nought => 'O',
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A column to drop a seed into, 0-based.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Column(pub usize);

impl FromStr for Column {
    type Err = String;

    /// Parses a bare column number such as `"3"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let c = s.trim().parse::<usize>().map_err(|e| e.to_string())?;
        Ok(Column(c))
    }
}

/// Center-first column priority for a board `columns` wide.
///
/// Columns closer to `columns / 2` come first; equally distant columns are
/// listed left to right. For seven columns this is `3, 2, 4, 1, 5, 0, 6`.
pub fn center_order(columns: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..columns).collect();
    order.sort_by_key(|&c| (center_distance(c, columns), c));
    order
}

/// Distance of `column` from the center column `columns / 2`.
pub fn center_distance(column: usize, columns: usize) -> usize {
    column.abs_diff(columns / 2)
}

/// The grid of cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Row-major cells, `None` for empty
    cells: Vec<Option<Seed>>,
    rows: usize,
    columns: usize,
}

impl Default for Board {
    fn default() -> Self {
        Board::standard()
    }
}

impl Board {
    /// Creates an empty board.
    ///
    /// Both sides must be between 1 and [`MAX_DIMENSION`].
    pub fn new(rows: usize, columns: usize) -> Result<Self, BoardError> {
        if rows == 0 || columns == 0 || rows > MAX_DIMENSION || columns > MAX_DIMENSION {
            return Err(BoardError::InvalidDimensions { rows, columns });
        }
        Ok(Board {
            cells: vec![None; rows * columns],
            rows,
            columns,
        })
    }

    /// An empty 6x7 board.
    pub fn standard() -> Self {
        Board {
            cells: vec![None; DEFAULT_ROWS * DEFAULT_COLUMNS],
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Row-major view of all cells.
    pub fn cells(&self) -> &[Option<Seed>] {
        &self.cells
    }

    #[inline]
    fn index(&self, row: usize, column: usize) -> usize {
        row * self.columns + column
    }

    fn check_column(&self, column: usize) -> Result<(), BoardError> {
        if column >= self.columns {
            return Err(BoardError::ColumnOutOfRange {
                column,
                columns: self.columns,
            });
        }
        Ok(())
    }

    fn check_cell(&self, row: usize, column: usize) -> Result<(), BoardError> {
        self.check_column(column)?;
        if row >= self.rows {
            return Err(BoardError::RowOutOfRange { row, rows: self.rows });
        }
        Ok(())
    }

    /// Reads one cell.
    pub fn get(&self, row: usize, column: usize) -> Result<Option<Seed>, BoardError> {
        self.check_cell(row, column)?;
        Ok(self.cells[self.index(row, column)])
    }

    /// The row a seed dropped into `column` would land in, or `None` if the
    /// column is full.
    pub fn drop_row(&self, column: usize) -> Result<Option<usize>, BoardError> {
        self.check_column(column)?;
        Ok((0..self.rows)
            .rev()
            .find(|&row| self.cells[self.index(row, column)].is_none()))
    }

    /// True if `column` is on the board and has room for another seed.
    pub fn is_legal(&self, column: usize) -> bool {
        column < self.columns && self.cells[column].is_none()
    }

    /// Puts `seed` at `(row, column)`.
    ///
    /// `row` must be the column's current drop row.
    pub fn place(&mut self, row: usize, column: usize, seed: Seed) -> Result<(), BoardError> {
        self.check_cell(row, column)?;
        match self.drop_row(column)? {
            Some(drop) if drop == row => {
                let idx = self.index(row, column);
                self.cells[idx] = Some(seed);
                Ok(())
            }
            Some(_) => Err(BoardError::GravityViolation { row, column }),
            None => Err(BoardError::ColumnFull(column)),
        }
    }

    /// Empties `(row, column)`, which must hold the top seed of its column.
    pub fn clear(&mut self, row: usize, column: usize) -> Result<(), BoardError> {
        self.check_cell(row, column)?;
        let occupied = self.cells[self.index(row, column)].is_some();
        let top = row == 0 || self.cells[self.index(row - 1, column)].is_none();
        if !occupied || !top {
            return Err(BoardError::NotTopSeed { row, column });
        }
        let idx = self.index(row, column);
        self.cells[idx] = None;
        Ok(())
    }

    /// Drops `seed` into `column` and returns a guard that undoes the drop
    /// when it goes out of scope, unless [`Placement::commit`] is called.
    pub fn drop_seed(&mut self, column: usize, seed: Seed) -> Result<Placement<'_>, BoardError> {
        let row = self.drop_row(column)?.ok_or(BoardError::ColumnFull(column))?;
        let idx = self.index(row, column);
        self.cells[idx] = Some(seed);
        Ok(Placement {
            board: self,
            row,
            column,
            seed,
            committed: false,
        })
    }

    /// Whether the `seed` at `(row, column)` completes a line of [`LINE`].
    ///
    /// Only the four lines through the cell are scanned, up to three cells
    /// each way, so this is constant time for any board size.
    pub fn is_winning_move(&self, row: usize, column: usize, seed: Seed) -> Result<bool, BoardError> {
        self.check_cell(row, column)?;
        Ok(self.line_through(row, column, seed))
    }

    #[inline]
    fn line_through(&self, row: usize, column: usize, seed: Seed) -> bool {
        grid_lines::run_through(&self.cells, self.columns, self.rows, row, column, &Some(seed), LINE)
    }

    /// Columns from `ordering` that still have room, in `ordering`'s order.
    ///
    /// Out-of-range entries are skipped.
    pub fn legal_moves(&self, ordering: &[usize]) -> Vec<usize> {
        ordering.iter().copied().filter(|&c| self.is_legal(c)).collect()
    }

    /// The seed owning a line of four anywhere on the board, if any.
    pub fn winner(&self) -> Option<Seed> {
        [Seed::Cross, Seed::Nought]
            .into_iter()
            .find(|&seed| grid_lines::has_line(&self.cells, self.columns, self.rows, &Some(seed), LINE))
    }

    /// True when no column can take another seed.
    pub fn is_full(&self) -> bool {
        self.cells[..self.columns].iter().all(Option::is_some)
    }

    /// Number of cells holding `seed`.
    pub fn count(&self, seed: Seed) -> usize {
        self.cells.iter().filter(|&&c| c == Some(seed)).count()
    }

    /// Parses the format written by `Display`: one line per row, top row
    /// first, `X`/`O` for seeds and `.` for empty cells. Whitespace inside a
    /// line and blank lines are ignored.
    ///
    /// The result must satisfy gravity.
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let mut grid: Vec<Vec<Option<Seed>>> = Vec::new();
        for (n, line) in text.lines().enumerate() {
            let mut row = Vec::new();
            for ch in line.chars().filter(|c| !c.is_whitespace()) {
                row.push(match ch {
                    'X' | 'x' => Some(Seed::Cross),
                    'O' | 'o' => Some(Seed::Nought),
                    '.' | '_' | '-' => None,
                    other => {
                        return Err(BoardError::Parse(format!(
                            "unexpected character {:?} on line {}",
                            other,
                            n + 1
                        )))
                    }
                });
            }
            if !row.is_empty() {
                grid.push(row);
            }
        }

        let rows = grid.len();
        let columns = grid.first().map_or(0, Vec::len);
        if grid.iter().any(|r| r.len() != columns) {
            return Err(BoardError::Parse("rows have different lengths".to_string()));
        }

        let mut board = Board::new(rows, columns)?;
        for column in 0..columns {
            for row in (0..rows).rev() {
                if let Some(seed) = grid[row][column] {
                    board.place(row, column, seed)?;
                }
            }
        }
        Ok(board)
    }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::parse(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for c in 0..self.columns {
                let symbol = self.cells[self.index(r, c)].map_or('.', Seed::symbol);
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A seed dropped onto a board, undone when the guard is dropped.
///
/// Derefs to the board for reading. The only way to change the board while
/// the guard lives is [`Placement::drop_seed`], so guards nest and an inner
/// placement is always undone before the outer one.
#[derive(Debug)]
pub struct Placement<'a> {
    board: &'a mut Board,
    row: usize,
    column: usize,
    seed: Seed,
    committed: bool,
}

impl<'a> Placement<'a> {
    pub fn row(&self) -> usize {
        self.row
    }

    /// Whether this seed completed a line.
    pub fn is_win(&self) -> bool {
        self.board.line_through(self.row, self.column, self.seed)
    }

    /// Drops another seed on top of this position.
    pub fn drop_seed(&mut self, column: usize, seed: Seed) -> Result<Placement<'_>, BoardError> {
        self.board.drop_seed(column, seed)
    }

    /// Keeps the seed on the board and returns the `(row, column)` it landed on.
    pub fn commit(mut self) -> (usize, usize) {
        self.committed = true;
        (self.row, self.column)
    }
}

impl Deref for Placement<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl Drop for Placement<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        // A leaked inner guard leaves a seed above this one; both stay rather
        // than leaving it floating.
        let _ = self.board.clear(self.row, self.column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board() {
        let board = Board::standard();
        assert_eq!(board.rows(), 6);
        assert_eq!(board.columns(), 7);
        assert!(board.cells().iter().all(Option::is_none));
        assert_eq!(Board::new(0, 7), Err(BoardError::InvalidDimensions { rows: 0, columns: 7 }));
        assert!(Board::new(65, 7).is_err());
    }

    #[test]
    fn test_center_order() {
        assert_eq!(center_order(7), vec![3, 2, 4, 1, 5, 0, 6]);
        assert_eq!(center_order(1), vec![0]);
        assert_eq!(center_order(4), vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_drop_row_follows_gravity() {
        let mut board = Board::standard();
        assert_eq!(board.drop_row(3), Ok(Some(5)));
        board.place(5, 3, Seed::Cross).unwrap();
        assert_eq!(board.drop_row(3), Ok(Some(4)));
        assert_eq!(
            board.drop_row(7),
            Err(BoardError::ColumnOutOfRange { column: 7, columns: 7 })
        );
    }

    #[test]
    fn test_place_rejects_floating_seed() {
        let mut board = Board::standard();
        assert_eq!(
            board.place(3, 0, Seed::Cross),
            Err(BoardError::GravityViolation { row: 3, column: 0 })
        );
        for row in (0..6).rev() {
            board.place(row, 0, Seed::Nought).unwrap();
        }
        assert_eq!(board.place(0, 0, Seed::Cross), Err(BoardError::ColumnFull(0)));
        assert!(!board.is_legal(0));
    }

    #[test]
    fn test_clear_only_top_seed() {
        let mut board = Board::standard();
        board.place(5, 2, Seed::Cross).unwrap();
        board.place(4, 2, Seed::Nought).unwrap();
        assert_eq!(board.clear(5, 2), Err(BoardError::NotTopSeed { row: 5, column: 2 }));
        assert_eq!(board.clear(3, 2), Err(BoardError::NotTopSeed { row: 3, column: 2 }));
        board.clear(4, 2).unwrap();
        board.clear(5, 2).unwrap();
        assert_eq!(board, Board::standard());
    }

    #[test]
    fn test_placement_undone_on_drop() {
        let mut board = Board::standard();
        {
            let mut first = board.drop_seed(3, Seed::Cross).unwrap();
            assert_eq!(first.row(), 5);
            let second = first.drop_seed(3, Seed::Nought).unwrap();
            assert_eq!(second.row(), 4);
            assert_eq!(second.get(4, 3), Ok(Some(Seed::Nought)));
        }
        assert_eq!(board, Board::standard());
    }

    #[test]
    fn test_leaked_inner_placement_keeps_gravity() {
        let mut board = Board::standard();
        {
            let mut first = board.drop_seed(3, Seed::Cross).unwrap();
            let second = first.drop_seed(3, Seed::Nought).unwrap();
            std::mem::forget(second);
        }
        assert_eq!(board.get(5, 3), Ok(Some(Seed::Cross)));
        assert_eq!(board.get(4, 3), Ok(Some(Seed::Nought)));
        assert_eq!(Board::parse(&board.to_string()), Ok(board.clone()));
    }

    #[test]
    fn test_placement_commit_keeps_seed() {
        let mut board = Board::standard();
        let landed = board.drop_seed(1, Seed::Cross).unwrap().commit();
        assert_eq!(landed, (5, 1));
        assert_eq!(board.get(5, 1), Ok(Some(Seed::Cross)));
    }

    #[test]
    fn test_win_condition_horizontal() {
        let board = Board::parse(
            ".......
             .......
             .......
             .......
             OOO....
             XXXX...",
        )
        .unwrap();
        assert_eq!(board.is_winning_move(5, 3, Seed::Cross), Ok(true));
        assert_eq!(board.is_winning_move(5, 0, Seed::Cross), Ok(true));
        assert_eq!(board.is_winning_move(4, 2, Seed::Nought), Ok(false));
        assert_eq!(board.winner(), Some(Seed::Cross));
    }

    #[test]
    fn test_win_condition_vertical_and_diagonals() {
        let vertical = Board::parse(
            ".......
             .......
             O......
             O......
             O.X....
             OXX....",
        )
        .unwrap();
        assert_eq!(vertical.is_winning_move(2, 0, Seed::Nought), Ok(true));

        let rising = Board::parse(
            ".......
             .......
             ...X...
             ..XO...
             .XOO...
             XOOX...",
        )
        .unwrap();
        assert_eq!(rising.is_winning_move(2, 3, Seed::Cross), Ok(true));
        assert_eq!(rising.winner(), Some(Seed::Cross));

        let falling = Board::parse(
            ".......
             .......
             ...O...
             ...XO..
             ...XXO.
             ..XXOXO",
        )
        .unwrap();
        assert_eq!(falling.is_winning_move(5, 6, Seed::Nought), Ok(true));
        assert_eq!(falling.is_winning_move(2, 3, Seed::Nought), Ok(true));
    }

    #[test]
    fn test_three_in_a_row_is_not_a_win() {
        let board = Board::parse(
            ".......
             .......
             .......
             .......
             .......
             XXX.OOO",
        )
        .unwrap();
        for column in [0, 1, 2] {
            assert_eq!(board.is_winning_move(5, column, Seed::Cross), Ok(false));
        }
        assert_eq!(board.winner(), None);
        assert!(board.is_winning_move(6, 0, Seed::Cross).is_err());
    }

    #[test]
    fn test_legal_moves_keep_ordering() {
        let board = Board::parse(
            "..X....
             ..O....",
        )
        .unwrap();
        assert_eq!(board.legal_moves(&center_order(7)), vec![3, 4, 1, 5, 0, 6]);
        assert_eq!(board.legal_moves(&[6, 2, 9, 0]), vec![6, 0]);
    }

    #[test]
    fn test_parse_rejects_floating_seed() {
        let err = Board::parse(
            "...X...
             .......",
        )
        .unwrap_err();
        assert_eq!(err, BoardError::GravityViolation { row: 0, column: 3 });
        assert!(matches!(Board::parse("..\n..."), Err(BoardError::Parse(_))));
        assert!(matches!(Board::parse("..Z"), Err(BoardError::Parse(_))));
    }

    #[test]
    fn test_display_round_trip() {
        let mut board = Board::standard();
        board.drop_seed(3, Seed::Cross).unwrap().commit();
        board.drop_seed(3, Seed::Nought).unwrap().commit();
        let text = board.to_string();
        assert!(text.ends_with(". . . O . . . \n. . . X . . . \n"));
        assert_eq!(text.parse::<Board>(), Ok(board));
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new(2, 2).unwrap();
        assert!(!board.is_full());
        for column in 0..2 {
            board.drop_seed(column, Seed::Cross).unwrap().commit();
            board.drop_seed(column, Seed::Nought).unwrap().commit();
        }
        assert!(board.is_full());
        assert!(board.legal_moves(&center_order(2)).is_empty());
        assert_eq!(board.count(Seed::Cross), 2);
    }

    #[test]
    fn test_column_from_str() {
        assert_eq!("3".parse::<Column>(), Ok(Column(3)));
        assert_eq!(" 6 \n".parse::<Column>(), Ok(Column(6)));
        assert!("x".parse::<Column>().is_err());
    }
}
