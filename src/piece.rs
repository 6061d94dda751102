//! Active falling piece

use crate::board::{BOARD_WIDTH, Board};
use crate::kicks::WALL_KICKS;
use crate::tetromino::{Offset, Shape, rotate_cw};
use ratatui::style::Color;

/// Spawn origin: horizontally centered, top hidden row
pub const SPAWN_X: i32 = BOARD_WIDTH as i32 / 2;
pub const SPAWN_Y: i32 = 0;

/// An active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub shape: Shape,
    /// Current rotation state as relative cells
    pub cells: [Offset; 4],
    /// Origin on the board
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

impl Piece {
    /// Create a piece in spawn orientation at the spawn origin
    pub fn spawn(shape: Shape) -> Self {
        let def = shape.definition();
        Self {
            shape,
            cells: def.cells,
            x: SPAWN_X,
            y: SPAWN_Y,
            color: def.color,
        }
    }

    /// Absolute board positions of all 4 cells
    pub fn positions(&self) -> [(i32, i32); 4] {
        self.offset_positions(0, 0)
    }

    fn offset_positions(&self, dx: i32, dy: i32) -> [(i32, i32); 4] {
        self.cells.map(|(cx, cy)| (self.x + cx + dx, self.y + cy + dy))
    }

    /// Whether this piece displaced by (dx, dy) would collide
    pub fn collides(&self, board: &Board, dx: i32, dy: i32) -> bool {
        board.collides(&self.offset_positions(dx, dy))
    }

    /// Move by (dx, dy) if that does not collide
    pub fn try_move(&mut self, board: &Board, dx: i32, dy: i32) -> bool {
        if self.collides(board, dx, dy) {
            return false;
        }
        self.x += dx;
        self.y += dy;
        true
    }

    /// Whether a one-row downward move would collide
    pub fn is_grounded(&self, board: &Board) -> bool {
        self.collides(board, 0, 1)
    }

    /// Rotate clockwise, trying the kick table against the rotated cells.
    ///
    /// On failure the piece is left untouched.
    pub fn rotate(&mut self, board: &Board) -> bool {
        let candidate = Piece {
            cells: rotate_cw(&self.cells, self.shape),
            ..*self
        };
        for &(dx, dy) in &WALL_KICKS {
            if !candidate.collides(board, dx, dy) {
                self.cells = candidate.cells;
                self.x += dx;
                self.y += dy;
                return true;
            }
        }
        false
    }

    /// Move down as far as possible and return the distance dropped
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        let mut distance = 0;
        while self.try_move(board, 0, 1) {
            distance += 1;
        }
        distance
    }

    /// Landing row of the origin (where the piece would rest)
    pub fn ghost_y(&self, board: &Board) -> i32 {
        let mut dy = 0;
        while !self.collides(board, 0, dy + 1) {
            dy += 1;
        }
        self.y + dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, TOTAL_HEIGHT};

    #[test]
    fn test_spawn_position() {
        let piece = Piece::spawn(Shape::T);
        assert_eq!((piece.x, piece.y), (5, 0));
        assert_eq!(piece.cells, Shape::T.spawn_cells());
        assert_eq!(piece.color, Shape::T.color());
    }

    #[test]
    fn test_move_down() {
        let board = Board::new();
        let mut piece = Piece::spawn(Shape::T);
        assert!(piece.try_move(&board, 0, 1));
        assert_eq!(piece.y, 1);
    }

    #[test]
    fn test_walls_block_moves() {
        let board = Board::new();
        let mut piece = Piece::spawn(Shape::I);
        let mut moved = 0;
        while piece.try_move(&board, -1, 0) {
            moved += 1;
        }
        // I spans x-1..x+2, so the origin stops at x = 1
        assert_eq!(moved, 4);
        assert_eq!(piece.x, 1);
        assert!(piece.positions().iter().all(|&(x, _)| x >= 0));
    }

    #[test]
    fn test_hard_drop_reaches_floor() {
        let board = Board::new();
        let mut piece = Piece::spawn(Shape::I);
        let distance = piece.hard_drop(&board);
        assert_eq!(distance, TOTAL_HEIGHT as u32 - 1);
        assert!(piece.is_grounded(&board));
        assert_eq!(piece.ghost_y(&board), piece.y);
    }

    #[test]
    fn test_rotate_in_open_space() {
        let board = Board::new();
        let mut piece = Piece::spawn(Shape::T);
        piece.y = 5;
        assert!(piece.rotate(&board));
        assert_eq!(piece.cells, rotate_cw(&Shape::T.spawn_cells(), Shape::T));
        assert_eq!((piece.x, piece.y), (5, 5));
    }

    #[test]
    fn test_rotate_kicks_right_near_left_wall() {
        let board = Board::new();
        // One turn makes the I vertical: cells (0,1),(0,0),(0,-1),(0,-2)
        let mut piece = Piece::spawn(Shape::I);
        piece.y = 5;
        assert!(piece.rotate(&board));
        piece.x = 1;
        // Back to horizontal spans x-2..x+1, so it needs the +1 kick
        assert!(piece.rotate(&board));
        assert_eq!(piece.x, 2);
        assert!(!piece.collides(&board, 0, 0));
    }

    #[test]
    fn test_rotation_rejected_against_left_wall() {
        let board = Board::new();
        let mut piece = Piece::spawn(Shape::I);
        piece.y = 5;
        assert!(piece.rotate(&board));
        while piece.try_move(&board, -1, 0) {}
        assert_eq!(piece.x, 0);
        let before = piece;
        assert!(!piece.rotate(&board));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_rotate_uses_first_fitting_kick() {
        let mut board = Board::new();
        let mut piece = Piece::spawn(Shape::T);
        piece.y = 10;
        // T rotated: (0,1),(0,0),(0,-1),(1,0) around (5,10); block (5,9)
        board.set(5, 9, Cell::Filled(Color::Red));
        assert!(piece.rotate(&board));
        // (0,0) fails on (5,9), (+1,0) fits
        assert_eq!(piece.x, 6);
        assert_eq!(piece.y, 10);
    }

    #[test]
    fn test_rotation_rejected_when_boxed_in() {
        let mut board = Board::new();
        let mut piece = Piece::spawn(Shape::T);
        piece.y = 10;
        for x in 0..BOARD_WIDTH as i32 {
            for y in [8, 9] {
                board.set(x, y, Cell::Filled(Color::Red));
            }
        }
        let before = piece;
        assert!(!piece.rotate(&board));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_square_rotation_is_noop() {
        let board = Board::new();
        let mut piece = Piece::spawn(Shape::O);
        let before = piece;
        assert!(piece.rotate(&board));
        assert_eq!(piece, before);
    }
}
