use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Number of same-token cells in a line needed to win.
pub const CONNECT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

/// Largest number of cells a board may have.
pub const MAX_CELLS: usize = 1 << 16;

/// Board size, fixed for the lifetime of a board.
///
/// Always at least 1x1 and at most [`MAX_CELLS`] cells; deserialization goes
/// through the same checks as [`Dimensions::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawDimensions")]
pub struct Dimensions {
    rows: usize,
    cols: usize,
}

#[derive(Deserialize)]
struct RawDimensions {
    rows: usize,
    cols: usize,
}

impl TryFrom<RawDimensions> for Dimensions {
    type Error = ConfigError;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        Dimensions::new(raw.rows, raw.cols)
    }
}

impl Dimensions {
    pub fn new(rows: usize, cols: usize) -> Result<Self, ConfigError> {
        if rows == 0 {
            return Err(ConfigError::Validation("board.rows must be >= 1".into()));
        }
        if cols == 0 {
            return Err(ConfigError::Validation("board.cols must be >= 1".into()));
        }
        match rows.checked_mul(cols) {
            Some(cells) if cells <= MAX_CELLS => Ok(Dimensions { rows, cols }),
            _ => Err(ConfigError::Validation(format!(
                "board.rows * board.cols must be <= {MAX_CELLS}"
            ))),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Dimensions {
            rows: ROWS,
            cols: COLS,
        }
    }
}

/// A cell coordinate. Row 0 is the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

/// Line directions scanned for four-in-a-row, as (row step, col step).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
    /// Top-left to bottom-right, \
    Diagonal,
    /// Bottom-left to top-right, /
    AntiDiagonal,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::Diagonal,
        Direction::AntiDiagonal,
    ];

    pub fn step(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::Diagonal => (1, 1),
            Direction::AntiDiagonal => (-1, 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    dims: Dimensions,
    cells: Vec<Vec<Cell>>,
}

impl Board {
    /// Create a new empty 6x7 board
    pub fn new() -> Self {
        Self::with_dimensions(Dimensions::default())
    }

    pub fn with_dimensions(dims: Dimensions) -> Self {
        Board {
            dims,
            cells: vec![vec![Cell::Empty; dims.cols]; dims.rows],
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn rows(&self) -> usize {
        self.dims.rows
    }

    pub fn cols(&self) -> usize {
        self.dims.cols
    }

    /// Get the cell at a specific position.
    /// Row 0 is the top, row `rows - 1` is the bottom.
    /// Out-of-bounds coordinates read as `None`.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Iterate rows from top to bottom
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Check if a column is full. Columns outside the board count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= self.dims.cols {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// Lowest empty row in a column, if any
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= self.dims.cols {
            return None;
        }
        (0..self.dims.rows)
            .rev()
            .find(|&row| self.cells[row][col] == Cell::Empty)
    }

    /// Drop a piece in a column, returns the row where it landed.
    /// Returns `None` without touching the board if the column is full or
    /// outside the board.
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Option<usize> {
        let row = self.landing_row(col)?;
        self.cells[row][col] = cell;
        Some(row)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.count_filled() == self.dims.cell_count()
    }

    pub fn count_filled(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell != Cell::Empty)
            .count()
    }

    /// Check whether `cell` has four in a row anywhere on the board
    pub fn has_four(&self, cell: Cell) -> bool {
        self.winning_line(cell).is_some()
    }

    /// Scan the whole board for four consecutive `cell` tokens.
    ///
    /// Directions are tried in the order of [`Direction::ALL`]; within a
    /// direction, starting cells are visited row-major. The first match is
    /// returned. `Cell::Empty` never wins.
    pub fn winning_line(&self, cell: Cell) -> Option<[Position; CONNECT]> {
        if cell == Cell::Empty {
            return None;
        }

        for direction in Direction::ALL {
            for row in 0..self.dims.rows {
                for col in 0..self.dims.cols {
                    if let Some(line) = self.line_from(row, col, direction) {
                        if line.iter().all(|p| self.cells[p.row][p.col] == cell) {
                            return Some(line);
                        }
                    }
                }
            }
        }

        None
    }

    /// The four positions starting at (row, col) along `direction`, or `None`
    /// if the run leaves the board.
    fn line_from(&self, row: usize, col: usize, direction: Direction) -> Option<[Position; CONNECT]> {
        let (dr, dc) = direction.step();
        let mut line = [Position::new(row, col); CONNECT];
        for (i, slot) in line.iter_mut().enumerate() {
            let r = row.checked_add_signed(dr * i as isize)?;
            let c = col.checked_add_signed(dc * i as isize)?;
            if r >= self.dims.rows || c >= self.dims.cols {
                return None;
            }
            *slot = Position::new(r, c);
        }
        Some(line)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => '.',
                    Cell::Red => 'R',
                    Cell::Yellow => 'Y',
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.rows(), ROWS);
        assert_eq!(board.cols(), COLS);
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), Some(Cell::Empty));
            }
        }
        assert_eq!(board.count_filled(), 0);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let board = Board::new();
        assert_eq!(board.get(ROWS, 0), None);
        assert_eq!(board.get(0, COLS), None);
    }

    #[test]
    fn test_drop_piece() {
        let mut board = Board::new();

        let row = board.drop_piece(3, Cell::Red).unwrap();
        assert_eq!(row, 5); // Should land at bottom
        assert_eq!(board.get(5, 3), Some(Cell::Red));

        let row = board.drop_piece(3, Cell::Yellow).unwrap();
        assert_eq!(row, 4); // On top of the first piece
        assert_eq!(board.get(4, 3), Some(Cell::Yellow));
    }

    #[test]
    fn test_column_full() {
        let mut board = Board::new();

        for _ in 0..ROWS {
            board.drop_piece(0, Cell::Red).unwrap();
        }

        let before = board.clone();
        assert!(board.is_column_full(0));
        assert_eq!(board.landing_row(0), None);
        assert_eq!(board.drop_piece(0, Cell::Yellow), None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new();
        assert!(board.is_column_full(7));
        assert_eq!(board.drop_piece(7, Cell::Red), None);
        assert_eq!(board.count_filled(), 0);
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                board.drop_piece(col, Cell::Red).unwrap();
            }
        }
        assert!(board.is_full());
        assert_eq!(board.count_filled(), ROWS * COLS);
    }

    #[test]
    fn test_horizontal_win() {
        let mut board = Board::new();
        for col in 1..5 {
            board.drop_piece(col, Cell::Red).unwrap();
        }
        let line = board.winning_line(Cell::Red).unwrap();
        assert_eq!(line[0], Position::new(5, 1));
        assert_eq!(line[3], Position::new(5, 4));
        assert!(!board.has_four(Cell::Yellow));
    }

    #[test]
    fn test_vertical_win() {
        let mut board = Board::new();
        for _ in 0..4 {
            board.drop_piece(3, Cell::Yellow).unwrap();
        }
        let line = board.winning_line(Cell::Yellow).unwrap();
        assert_eq!(line[0], Position::new(2, 3));
        assert_eq!(line[3], Position::new(5, 3));
    }

    #[test]
    fn test_diagonal_up_win() {
        let mut board = Board::new();
        // Create diagonal / pattern
        board.drop_piece(0, Cell::Red).unwrap();

        board.drop_piece(1, Cell::Yellow).unwrap();
        board.drop_piece(1, Cell::Red).unwrap();

        board.drop_piece(2, Cell::Yellow).unwrap();
        board.drop_piece(2, Cell::Yellow).unwrap();
        board.drop_piece(2, Cell::Red).unwrap();

        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Red).unwrap();

        let line = board.winning_line(Cell::Red).unwrap();
        assert_eq!(
            line,
            [
                Position::new(5, 0),
                Position::new(4, 1),
                Position::new(3, 2),
                Position::new(2, 3),
            ]
        );
    }

    #[test]
    fn test_diagonal_down_win() {
        let mut board = Board::new();
        // Create diagonal \ pattern
        board.drop_piece(6, Cell::Red).unwrap();

        board.drop_piece(5, Cell::Yellow).unwrap();
        board.drop_piece(5, Cell::Red).unwrap();

        board.drop_piece(4, Cell::Yellow).unwrap();
        board.drop_piece(4, Cell::Yellow).unwrap();
        board.drop_piece(4, Cell::Red).unwrap();

        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Red).unwrap();

        let line = board.winning_line(Cell::Red).unwrap();
        assert_eq!(
            line,
            [
                Position::new(2, 3),
                Position::new(3, 4),
                Position::new(4, 5),
                Position::new(5, 6),
            ]
        );
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = Board::new();
        for col in 0..3 {
            board.drop_piece(col, Cell::Red).unwrap();
        }
        assert!(!board.has_four(Cell::Red));
    }

    #[test]
    fn test_empty_never_wins() {
        let board = Board::new();
        assert!(!board.has_four(Cell::Empty));
    }

    #[test]
    fn test_small_board_cannot_fit_a_line() {
        let dims = Dimensions::new(3, 3).unwrap();
        let mut board = Board::with_dimensions(dims);
        for col in 0..3 {
            for _ in 0..3 {
                board.drop_piece(col, Cell::Red).unwrap();
            }
        }
        assert!(board.is_full());
        assert!(!board.has_four(Cell::Red));
    }

    #[test]
    fn test_dimensions_reject_zero() {
        assert!(Dimensions::new(0, 7).is_err());
        assert!(Dimensions::new(6, 0).is_err());
        assert_eq!(Dimensions::new(4, 5).unwrap().cell_count(), 20);
    }

    #[test]
    fn test_dimensions_reject_oversized() {
        assert!(Dimensions::new(256, 256).is_ok());
        assert!(matches!(
            Dimensions::new(256, 257),
            Err(ConfigError::Validation(_))
        ));
        // rows * cols overflows usize
        assert!(Dimensions::new(usize::MAX / 2, 3).is_err());
        assert!(Dimensions::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_dimensions_deserialize_validates() {
        let dims: Dimensions = serde_json::from_str(r#"{"rows":5,"cols":8}"#).unwrap();
        assert_eq!(dims, Dimensions::new(5, 8).unwrap());

        assert!(serde_json::from_str::<Dimensions>(r#"{"rows":0,"cols":7}"#).is_err());
        assert!(serde_json::from_str::<Dimensions>(r#"{"rows":6,"cols":0}"#).is_err());
        assert!(serde_json::from_str::<Dimensions>(r#"{"rows":1000,"cols":1000}"#).is_err());
    }

    #[test]
    fn test_is_full_after_partial_fill() {
        let mut board = Board::with_dimensions(Dimensions::new(2, 2).unwrap());
        for col in [0, 0, 1] {
            board.drop_piece(col, Cell::Red).unwrap();
            assert!(!board.is_full());
        }
        board.drop_piece(1, Cell::Yellow).unwrap();
        assert_eq!(board.count_filled(), board.dimensions().cell_count());
        assert!(board.is_full());
    }

    #[test]
    fn test_display() {
        let mut board = Board::with_dimensions(Dimensions::new(2, 3).unwrap());
        board.drop_piece(0, Cell::Red).unwrap();
        board.drop_piece(2, Cell::Yellow).unwrap();
        assert_eq!(board.to_string(), "...\nR.Y\n");
    }
}
