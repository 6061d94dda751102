//! Wall kick table
//!
//! After a rotation the rotated shape is tried at each of these offsets in
//! order. The first one that does not collide is accepted. This is a small
//! fixed table shared by every shape, not a per-rotation-state kick system.

use crate::tetromino::Offset;

/// Kick candidates as (dx, dy): none, one right, one left, one up
pub const WALL_KICKS: [Offset; 4] = [(0, 0), (1, 0), (-1, 0), (0, -1)];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_kick_is_identity() {
        assert_eq!(WALL_KICKS[0], (0, 0));
    }

    #[test]
    fn test_kick_order() {
        // Right before left, upward nudge last
        assert_eq!(WALL_KICKS, [(0, 0), (1, 0), (-1, 0), (0, -1)]);
    }
}
