//! Board engine: the board, the active piece, the next pointer and the hold slot
//!
//! Every mutation is collision-checked before it is applied. The engine
//! knows nothing about time; the game loop decides when to call it.

use crate::bag::Bag;
use crate::board::Board;
use crate::piece::Piece;
use crate::tetromino::Shape;

#[derive(Debug, Clone)]
pub struct Engine {
    board: Board,
    /// None before the first spawn, while a clear is pending, and after top-out
    active: Option<Piece>,
    /// Shape the next spawn will use
    next: Shape,
    bag: Bag,
    hold: Option<Shape>,
    /// Set by a successful hold, cleared by every spawn
    hold_used: bool,
}

impl Engine {
    /// Empty board with the next pointer primed from the bag
    pub fn new(mut bag: Bag) -> Self {
        let next = bag.next();
        Self {
            board: Board::new(),
            active: None,
            next,
            bag,
            hold: None,
            hold_used: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn next_shape(&self) -> Shape {
        self.next
    }

    pub fn held(&self) -> Option<Shape> {
        self.hold
    }

    /// Whether hold is still available this spawn cycle
    pub fn can_hold(&self) -> bool {
        self.active.is_some() && !self.hold_used
    }

    /// Whether the active piece displaced by (dx, dy) would collide.
    ///
    /// With no active piece there is nothing that could move, so this is true.
    pub fn collides(&self, dx: i32, dy: i32) -> bool {
        self.active
            .as_ref()
            .is_none_or(|piece| piece.collides(&self.board, dx, dy))
    }

    /// Whether a one-row downward move would collide
    pub fn is_grounded(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|piece| piece.is_grounded(&self.board))
    }

    /// Spawn the next-pointer shape at the top and draw a new next shape.
    ///
    /// Returns false when the spawn position is already occupied; no piece is
    /// placed in that case.
    pub fn spawn(&mut self) -> bool {
        let shape = self.next;
        self.next = self.bag.next();
        self.hold_used = false;

        let piece = Piece::spawn(shape);
        if piece.collides(&self.board, 0, 0) {
            self.active = None;
            return false;
        }
        self.active = Some(piece);
        true
    }

    /// Apply a displacement iff it does not collide
    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        match self.active.as_mut() {
            Some(piece) => piece.try_move(&self.board, dx, dy),
            None => false,
        }
    }

    /// Rotate clockwise with wall kicks; a rejected rotation changes nothing
    pub fn rotate(&mut self) -> bool {
        match self.active.as_mut() {
            Some(piece) => piece.rotate(&self.board),
            None => false,
        }
    }

    /// Step down until blocked; returns the distance travelled
    pub fn hard_drop(&mut self) -> u32 {
        match self.active.as_mut() {
            Some(piece) => piece.hard_drop(&self.board),
            None => 0,
        }
    }

    /// Landing row for the active piece origin
    pub fn ghost_y(&self) -> Option<i32> {
        self.active.as_ref().map(|piece| piece.ghost_y(&self.board))
    }

    /// Write the active piece into the board and return the full rows.
    ///
    /// Cells above the board are dropped. The active piece is consumed.
    pub fn lock_piece(&mut self) -> Vec<usize> {
        let Some(piece) = self.active.take() else {
            return Vec::new();
        };
        self.board.fill(&piece.positions(), piece.color);
        self.board.full_rows()
    }

    /// Remove the given rows (remove-and-shift per row); returns how many
    pub fn clear_rows(&mut self, rows: &[usize]) -> usize {
        self.board.clear_rows(rows)
    }

    /// Swap the active piece with the hold slot.
    ///
    /// With an empty slot the active shape is stashed and the next-pointer
    /// shape comes in. The incoming piece starts at the spawn position in
    /// spawn orientation. Allowed once per spawn cycle; a swap whose spawn
    /// position is blocked is rejected rather than ending the game.
    pub fn hold(&mut self) -> bool {
        if self.hold_used {
            return false;
        }
        let Some(current) = self.active else {
            return false;
        };

        let incoming = self.hold.unwrap_or(self.next);
        let piece = Piece::spawn(incoming);
        if piece.collides(&self.board, 0, 0) {
            return false;
        }

        if self.hold.is_none() {
            self.next = self.bag.next();
        }
        self.hold = Some(current.shape);
        self.active = Some(piece);
        self.hold_used = true;
        true
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn active_mut(&mut self) -> Option<&mut Piece> {
        self.active.as_mut()
    }
}
