//! Tetromino definitions and the clockwise rotation transform
//!
//! Cells are (x, y) offsets from the piece origin. x grows rightward and y
//! grows downward, matching board rows (row 0 is the top hidden row).

use ratatui::style::Color;

/// A relative cell offset (x, y)
pub type Offset = (i32, i32);

/// The 7 tetromino shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    I, // long bar
    O, // square
    T,
    S,
    Z,
    J,
    L,
}

/// Immutable catalog entry for a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Definition {
    pub shape: Shape,
    pub color: Color,
    /// Spawn orientation
    pub cells: [Offset; 4],
}

const DEFINITIONS: [Definition; 7] = [
    Definition {
        shape: Shape::I,
        color: Color::Rgb(0x60, 0xa5, 0xfa),
        cells: [(-1, 0), (0, 0), (1, 0), (2, 0)],
    },
    Definition {
        shape: Shape::O,
        color: Color::Rgb(0xfb, 0xbf, 0x24),
        cells: [(0, 0), (1, 0), (0, 1), (1, 1)],
    },
    Definition {
        shape: Shape::T,
        color: Color::Rgb(0xa7, 0x8b, 0xfa),
        cells: [(-1, 0), (0, 0), (1, 0), (0, 1)],
    },
    Definition {
        shape: Shape::S,
        color: Color::Rgb(0x34, 0xd3, 0x99),
        cells: [(0, 0), (1, 0), (-1, 1), (0, 1)],
    },
    Definition {
        shape: Shape::Z,
        color: Color::Rgb(0xf8, 0x71, 0x71),
        cells: [(-1, 0), (0, 0), (0, 1), (1, 1)],
    },
    Definition {
        shape: Shape::J,
        color: Color::Rgb(0x60, 0xa5, 0xfa),
        cells: [(-1, 0), (0, 0), (1, 0), (-1, 1)],
    },
    Definition {
        shape: Shape::L,
        color: Color::Rgb(0xf5, 0x9e, 0x0b),
        cells: [(-1, 0), (0, 0), (1, 0), (1, 1)],
    },
];

impl Shape {
    /// All shapes, in catalog order (used to fill the bag)
    pub fn all() -> [Shape; 7] {
        [
            Shape::I,
            Shape::O,
            Shape::T,
            Shape::S,
            Shape::Z,
            Shape::J,
            Shape::L,
        ]
    }

    /// Catalog lookup
    pub fn definition(self) -> &'static Definition {
        &DEFINITIONS[self as usize]
    }

    pub fn color(self) -> Color {
        self.definition().color
    }

    /// Cells in spawn orientation
    pub fn spawn_cells(self) -> [Offset; 4] {
        self.definition().cells
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::I => "I",
            Shape::O => "O",
            Shape::T => "T",
            Shape::S => "S",
            Shape::Z => "Z",
            Shape::J => "J",
            Shape::L => "L",
        }
    }
}

/// Rotate cells clockwise: (x, y) -> (y, -x).
///
/// The square is rotation-invariant and comes back unchanged.
pub fn rotate_cw(cells: &[Offset; 4], shape: Shape) -> [Offset; 4] {
    if shape == Shape::O {
        return *cells;
    }
    cells.map(|(x, y)| (y, -x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_definition_lookup_matches_shape() {
        for shape in Shape::all() {
            assert_eq!(shape.definition().shape, shape);
        }
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for shape in Shape::all() {
            let spawn = shape.spawn_cells();
            let mut cells = spawn;
            for _ in 0..4 {
                cells = rotate_cw(&cells, shape);
            }
            assert_eq!(cells, spawn, "{} did not come back", shape.name());
        }
    }

    #[test]
    fn test_single_rotation_changes_non_square() {
        for shape in Shape::all() {
            let spawn = shape.spawn_cells();
            let rotated = rotate_cw(&spawn, shape);
            if shape == Shape::O {
                assert_eq!(rotated, spawn);
            } else {
                assert_ne!(rotated, spawn, "{} should change", shape.name());
            }
        }
    }

    #[test]
    fn test_rotate_t_cells() {
        let rotated = rotate_cw(&Shape::T.spawn_cells(), Shape::T);
        assert_eq!(rotated, [(0, 1), (0, 0), (0, -1), (1, 0)]);
    }

    #[test]
    fn test_every_shape_has_four_distinct_cells() {
        for shape in Shape::all() {
            let unique: HashSet<_> = shape.spawn_cells().iter().copied().collect();
            assert_eq!(unique.len(), 4);
        }
    }
}
