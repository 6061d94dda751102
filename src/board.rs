//! Game board representation, collision rules and row removal

use ratatui::style::Color;

/// Board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const VISIBLE_HEIGHT: usize = 20;
/// Hidden rows above the visible board for spawning
pub const HIDDEN_ROWS: usize = 2;
pub const TOTAL_HEIGHT: usize = VISIBLE_HEIGHT + HIDDEN_ROWS;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

pub type Row = [Cell; BOARD_WIDTH];

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Grid stored as [y][x]; y = 0 is the top hidden row, y grows downward
    cells: [Row; TOTAL_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_WIDTH]; TOTAL_HEIGHT],
        }
    }

    pub fn width(&self) -> usize {
        BOARD_WIDTH
    }

    pub fn height(&self) -> usize {
        TOTAL_HEIGHT
    }

    /// Get the cell at (x, y); None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        let (x, y) = Self::index(x, y)?;
        Some(self.cells[y][x])
    }

    /// Set a cell; returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some((x, y)) => {
                self.cells[y][x] = cell;
                true
            }
            None => false,
        }
    }

    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < BOARD_WIDTH && y < TOTAL_HEIGHT).then_some((x, y))
    }

    /// Whether a single cell position is blocked for a piece.
    ///
    /// Outside [0, width) or at/below the floor is blocked. Rows above the
    /// board (negative y) are open spawn space and never block.
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i32 || y >= TOTAL_HEIGHT as i32 {
            return true;
        }
        if y < 0 {
            return false;
        }
        self.cells[y as usize][x as usize].is_filled()
    }

    /// Whether any of the positions is blocked
    pub fn collides(&self, positions: &[(i32, i32)]) -> bool {
        positions.iter().any(|&(x, y)| self.is_blocked(x, y))
    }

    /// Write filled cells; positions above or outside the board are dropped
    pub fn fill(&mut self, positions: &[(i32, i32)], color: Color) {
        for &(x, y) in positions {
            self.set(x, y, Cell::Filled(color));
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.cells[y].iter().all(Cell::is_filled)
    }

    /// Indices of all full rows, top to bottom
    pub fn full_rows(&self) -> Vec<usize> {
        (0..TOTAL_HEIGHT).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Remove one row: everything above shifts down by one, row 0 becomes empty
    pub fn remove_row(&mut self, y: usize) {
        if y >= TOTAL_HEIGHT {
            return;
        }
        for yy in (1..=y).rev() {
            self.cells[yy] = self.cells[yy - 1];
        }
        self.cells[0] = [Cell::Empty; BOARD_WIDTH];
    }

    /// Remove each row in ascending index order, one shift per row.
    ///
    /// Rows must be indices recorded against the current board. Removing a
    /// row only moves rows with smaller indices, so later (larger) indices
    /// stay valid.
    pub fn clear_rows(&mut self, rows: &[usize]) -> usize {
        let mut sorted = rows.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for &y in &sorted {
            self.remove_row(y);
        }
        sorted.len()
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(Cell::is_empty))
    }

    /// All rows, top (hidden) to bottom
    pub fn rows(&self) -> &[Row; TOTAL_HEIGHT] {
        &self.cells
    }

    /// Visible rows only, top to bottom, with their board index
    pub fn visible_rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.cells.iter().enumerate().skip(HIDDEN_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOOR: i32 = TOTAL_HEIGHT as i32 - 1;

    fn fill_row_except(board: &mut Board, y: i32, gap: Option<i32>) {
        for x in 0..BOARD_WIDTH as i32 {
            if Some(x) != gap {
                board.set(x, y, Cell::Filled(Color::Cyan));
            }
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 22);
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::new();
        assert!(board.set(5, 5, Cell::Filled(Color::Red)));
        assert_eq!(board.get(5, 5), Some(Cell::Filled(Color::Red)));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::new();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(0, TOTAL_HEIGHT as i32), None);
        assert_eq!(board.get(BOARD_WIDTH as i32, 0), None);
        assert!(!board.set(0, -1, Cell::Filled(Color::Red)));
        assert!(board.is_empty());
    }

    #[test]
    fn test_blocked_rules() {
        let mut board = Board::new();
        board.set(3, 10, Cell::Filled(Color::Red));
        assert!(board.is_blocked(-1, 5));
        assert!(board.is_blocked(BOARD_WIDTH as i32, 5));
        assert!(board.is_blocked(0, FLOOR + 1));
        assert!(board.is_blocked(3, 10));
        assert!(!board.is_blocked(4, 10));
        // above the board is open
        assert!(!board.is_blocked(4, -3));
        // but walls still apply above the board
        assert!(board.is_blocked(-1, -3));
    }

    #[test]
    fn test_full_rows_detection() {
        let mut board = Board::new();
        fill_row_except(&mut board, FLOOR, None);
        fill_row_except(&mut board, FLOOR - 1, Some(4));
        fill_row_except(&mut board, FLOOR - 2, None);
        assert_eq!(
            board.full_rows(),
            vec![(FLOOR - 2) as usize, FLOOR as usize]
        );
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::new();
        fill_row_except(&mut board, FLOOR, None);
        board.set(0, FLOOR - 1, Cell::Filled(Color::Red));

        assert_eq!(board.clear_rows(&board.full_rows()), 1);
        // The block from the row above should now be on the floor
        assert_eq!(board.get(0, FLOOR), Some(Cell::Filled(Color::Red)));
        assert!(board.get(1, FLOOR).is_some_and(|c| c.is_empty()));
        assert!(board.rows()[0].iter().all(Cell::is_empty));
    }

    #[test]
    fn test_clear_split_rows_keeps_provenance() {
        let mut board = Board::new();
        // full, partial (gap at 4, marker color), full
        fill_row_except(&mut board, FLOOR, None);
        for x in 0..BOARD_WIDTH as i32 {
            if x != 4 {
                board.set(x, FLOOR - 1, Cell::Filled(Color::Red));
            }
        }
        fill_row_except(&mut board, FLOOR - 2, None);
        board.set(7, FLOOR - 3, Cell::Filled(Color::Green));

        let rows = board.full_rows();
        assert_eq!(board.clear_rows(&rows), 2);

        // partial row drops by one, marker drops by two
        assert_eq!(board.get(0, FLOOR), Some(Cell::Filled(Color::Red)));
        assert!(board.get(4, FLOOR).is_some_and(|c| c.is_empty()));
        assert_eq!(board.get(7, FLOOR - 1), Some(Cell::Filled(Color::Green)));
        assert!(board.full_rows().is_empty());
    }

    #[test]
    fn test_fill_drops_cells_above_board() {
        let mut board = Board::new();
        board.fill(&[(0, -1), (1, -2), (2, 0)], Color::Blue);
        assert_eq!(board.get(2, 0), Some(Cell::Filled(Color::Blue)));
        assert_eq!(
            board.rows().iter().flatten().filter(|c| c.is_filled()).count(),
            1
        );
    }

    #[test]
    fn test_visible_rows_skip_hidden() {
        let board = Board::new();
        let rows: Vec<_> = board.visible_rows().map(|(y, _)| y).collect();
        assert_eq!(rows.len(), VISIBLE_HEIGHT);
        assert_eq!(rows[0], HIDDEN_ROWS);
    }
}
