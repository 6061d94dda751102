//! Nostalgia Arcade - a terminal mini-arcade
//!
//! The library holds the game core: board engine, piece logic, scoring and
//! the frame-driven Tetris controller behind the [`arcade::Game`] lifecycle.
//! The binary supplies the terminal host (routing, rendering, audio, settings).

// Allow unreachable patterns due to #[non_exhaustive] enums for future compatibility
#![allow(unreachable_patterns)]

pub mod arcade;
pub mod bag;
pub mod board;
pub mod engine;
pub mod game;
pub mod input;
pub mod kicks;
pub mod piece;
pub mod score;
pub mod tetromino;

pub use arcade::{Cue, Game, GameEvent, GameInfo, Phase, Scene, Surface, catalog, find, load_game};
pub use game::{GameConfig, TetrisGame, TetrisView};
pub use input::{Button, InputEvent};
