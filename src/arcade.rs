//! The contract between a game and the arcade host
//!
//! A host mounts a game on a [`Surface`], drives it with [`Game::frame`] and
//! [`Game::input`], and listens for [`GameEvent`]s and audio [`Cue`]s on
//! channels. Games never reach back into the host.

use crate::game::{GameConfig, TetrisGame, TetrisView};
use crate::input::InputEvent;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

/// Events a game reports to its host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Points gained (always positive)
    Score(u64),
    /// The run ended; fired once per run
    GameOver,
    /// Text the host may offer for sharing (informational)
    SharePayload(String),
}

/// Sound triggers; the host decides how (or whether) to play them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Rotate,
    SoftDrop,
    HardDrop,
    LineClear,
}

/// Lifecycle phase of a mounted game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Constructed or reset, not started
    #[default]
    Idle,
    Running,
    /// Frames keep presenting, gameplay is suspended
    Paused,
    /// Terminal until reset
    GameOver,
    /// Surface and listeners released; every call is a no-op
    Destroyed,
}

/// What a game presents each frame
// Allow new games without breaking hosts
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum Scene {
    Tetris(TetrisView),
}

/// Rendering target owned by a mounted game
pub trait Surface {
    fn present(&mut self, scene: Scene);
}

/// A channel is the simplest surface: the host drains the latest scene
impl Surface for Sender<Scene> {
    fn present(&mut self, scene: Scene) {
        // A dropped receiver just means nobody is watching
        let _ = self.send(scene);
    }
}

/// Lifecycle every arcade game implements.
///
/// All calls are tolerated in any order; nonsensical ones are no-ops.
pub trait Game {
    /// Registry id (also the best-score key)
    fn id(&self) -> &'static str;
    /// Mount on a surface and reset to a fresh idle state
    fn init(&mut self, surface: Box<dyn Surface>);
    fn start(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn reset(&mut self);
    /// Release the surface and all listeners; idempotent
    fn destroy(&mut self);
    /// Advance to `now` and present if a render is due
    fn frame(&mut self, now: Duration);
    fn input(&mut self, event: InputEvent, now: Duration);
    fn phase(&self) -> Phase;
    /// New listener for game events
    fn subscribe(&mut self) -> Receiver<GameEvent>;
    /// New listener for audio cues
    fn audio_cues(&mut self) -> Receiver<Cue>;
}

/// Catalog entry for the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub tagline: &'static str,
}

const CATALOG: &[GameInfo] = &[GameInfo {
    id: TetrisGame::ID,
    name: "Tetris",
    tagline: "Stack & clear lines",
}];

/// Games the arcade can load
pub fn catalog() -> &'static [GameInfo] {
    CATALOG
}

pub fn find(id: &str) -> Option<&'static GameInfo> {
    CATALOG.iter().find(|info| info.id == id)
}

/// Construct a game by id
pub fn load_game(id: &str, config: &GameConfig) -> Option<Box<dyn Game>> {
    match id {
        TetrisGame::ID => Some(Box::new(TetrisGame::new(config.clone()))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_catalog_entries_load() {
        for info in catalog() {
            let game = load_game(info.id, &GameConfig::default());
            assert!(game.is_some_and(|g| g.id() == info.id));
        }
    }

    #[test]
    fn test_unknown_game_is_none() {
        assert!(load_game("snake", &GameConfig::default()).is_none());
        assert!(find("pong").is_none());
        assert_eq!(find("tetris").map(|g| g.name), Some("Tetris"));
    }

    #[test]
    fn test_sender_surface_survives_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        let mut surface: Box<dyn Surface> = Box::new(tx);
        drop(rx);
        let game = TetrisGame::new(GameConfig::default());
        surface.present(Scene::Tetris(game.view()));
    }
}
