//! Tetris game loop and input controller
//!
//! Drives the board engine from a frame clock and input events. Every timer
//! (gravity, lock delay, DAS/ARR, line-clear flash, render throttle) is a
//! recorded timestamp compared against the `now` passed into [`TetrisGame::frame`];
//! nothing sleeps.
//!
//! Per-frame order: pending line clear, then gravity and lock delay, then
//! DAS/ARR repeats, then render.

use crate::arcade::{Cue, Game, GameEvent, Phase, Scene, Surface};
use crate::bag::Bag;
use crate::board::Board;
use crate::engine::Engine;
use crate::input::{AutoRepeat, Button, DEFAULT_ARR, DEFAULT_DAS, InputEvent};
use crate::piece::Piece;
use crate::score::Score;
use crate::tetromino::Shape;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// Grace period between grounding and locking
pub const LOCK_DELAY: Duration = Duration::from_millis(500);
/// Flash duration for full rows before they are removed
pub const LINE_CLEAR_DELAY: Duration = Duration::from_millis(140);
/// Minimum time between two presented frames (~60fps)
pub const RENDER_INTERVAL: Duration = Duration::from_millis(16);

/// Timing and randomness knobs for a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub das: Duration,
    pub arr: Duration,
    pub lock_delay: Duration,
    pub line_clear_delay: Duration,
    pub render_interval: Duration,
    /// Fixed bag seed; None seeds from entropy on every reset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            das: DEFAULT_DAS,
            arr: DEFAULT_ARR,
            lock_delay: LOCK_DELAY,
            line_clear_delay: LINE_CLEAR_DELAY,
            render_interval: RENDER_INTERVAL,
            seed: None,
        }
    }
}

impl GameConfig {
    fn bag(&self) -> Bag {
        match self.seed {
            Some(seed) => Bag::with_seed(seed),
            None => Bag::new(),
        }
    }
}

/// Read-only projection of the game for rendering and previews
#[derive(Debug, Clone, PartialEq)]
pub struct TetrisView {
    pub board: Board,
    pub active: Option<Piece>,
    /// Landing row of the active piece origin
    pub ghost_y: Option<i32>,
    /// Rows flagged full and flashing before removal
    pub flashing: Vec<usize>,
    pub next: Shape,
    pub held: Option<Shape>,
    pub can_hold: bool,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub phase: Phase,
}

#[derive(Debug, Clone)]
struct PendingClear {
    rows: Vec<usize>,
    deadline: Duration,
}

/// The Tetris game
pub struct TetrisGame {
    config: GameConfig,
    engine: Engine,
    score: Score,
    phase: Phase,
    repeat: AutoRepeat,
    surface: Option<Box<dyn Surface>>,
    listeners: Vec<Sender<GameEvent>>,
    cue_listeners: Vec<Sender<Cue>>,
    /// Last gravity tick (or soft drop / spawn)
    last_gravity: Duration,
    /// Set while grounded; cleared whenever the piece is airborne
    lock_since: Option<Duration>,
    pending_clear: Option<PendingClear>,
    last_render: Option<Duration>,
    /// Re-anchor timers to the first frame after start/resume
    reanchor: bool,
}

impl TetrisGame {
    pub const ID: &'static str = "tetris";

    /// Fresh idle game with the first piece already spawned
    pub fn new(config: GameConfig) -> Self {
        let mut engine = Engine::new(config.bag());
        engine.spawn();
        Self {
            repeat: AutoRepeat::new(config.das, config.arr),
            engine,
            config,
            score: Score::new(),
            phase: Phase::Idle,
            surface: None,
            listeners: Vec::new(),
            cue_listeners: Vec::new(),
            last_gravity: Duration::ZERO,
            lock_since: None,
            pending_clear: None,
            last_render: None,
            reanchor: true,
        }
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Whether full rows are flashing and waiting for removal
    pub fn is_clearing(&self) -> bool {
        self.pending_clear.is_some()
    }

    /// Snapshot of everything a renderer needs
    pub fn view(&self) -> TetrisView {
        TetrisView {
            board: self.engine.board().clone(),
            active: self.engine.active().copied(),
            ghost_y: self.engine.ghost_y(),
            flashing: self
                .pending_clear
                .as_ref()
                .map(|pending| pending.rows.clone())
                .unwrap_or_default(),
            next: self.engine.next_shape(),
            held: self.engine.held(),
            can_hold: self.engine.can_hold(),
            score: self.score.points,
            level: self.score.level,
            lines: self.score.lines,
            phase: self.phase,
        }
    }

    fn step(&mut self, now: Duration) {
        if self.reanchor {
            self.reanchor = false;
            self.last_gravity = now;
            if self.lock_since.is_some() {
                self.lock_since = Some(now);
            }
            if let Some(pending) = self.pending_clear.as_mut() {
                pending.deadline = now + self.config.line_clear_delay;
            }
        }

        // 1. line clear flash
        if let Some(pending) = &self.pending_clear {
            if now < pending.deadline {
                return;
            }
            self.resolve_clear(now);
            if self.phase != Phase::Running {
                return;
            }
        }

        // 2. gravity and lock delay
        self.apply_gravity(now);

        // 3. held buttons
        if self.phase == Phase::Running {
            for button in self.repeat.update(now) {
                self.apply(button, now);
            }
        }
    }

    fn apply_gravity(&mut self, now: Duration) {
        if self.engine.active().is_none() {
            return;
        }
        let interval = Duration::from_millis(self.score.gravity_interval_ms());
        if now.saturating_sub(self.last_gravity) >= interval {
            // A blocked fall is handled by the lock delay below
            self.engine.try_move(0, 1);
            self.last_gravity = now;
        }
        self.update_lock(now);
    }

    /// Grounded handling: start the lock timer on grounding, lock on expiry
    fn update_lock(&mut self, now: Duration) {
        if !self.engine.is_grounded() {
            self.lock_since = None;
            return;
        }
        match self.lock_since {
            None => self.lock_since = Some(now),
            Some(since) if now.saturating_sub(since) >= self.config.lock_delay => self.lock(now),
            Some(_) => {}
        }
    }

    fn lock(&mut self, now: Duration) {
        self.lock_since = None;
        let rows = self.engine.lock_piece();
        if rows.is_empty() {
            self.spawn(now);
            return;
        }
        tracing::debug!(rows = ?rows, "rows full, flashing");
        self.cue(Cue::LineClear);
        self.pending_clear = Some(PendingClear {
            rows,
            deadline: now + self.config.line_clear_delay,
        });
    }

    fn resolve_clear(&mut self, now: Duration) {
        let Some(pending) = self.pending_clear.take() else {
            return;
        };
        let cleared = self.engine.clear_rows(&pending.rows);
        let level = self.score.level;
        let gained = self.score.add_clear(cleared);
        self.award(gained);
        if self.score.level != level {
            tracing::debug!(level = self.score.level, lines = self.score.lines, "level up");
        }
        self.spawn(now);
    }

    fn spawn(&mut self, now: Duration) {
        if self.engine.spawn() {
            self.last_gravity = now;
            self.lock_since = None;
        } else {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        if self.phase == Phase::GameOver {
            return;
        }
        tracing::info!(
            score = self.score.points,
            lines = self.score.lines,
            level = self.score.level,
            "game over"
        );
        self.phase = Phase::GameOver;
        self.repeat.clear();
        self.emit(GameEvent::GameOver);
    }

    /// Act on a (possibly repeated) button
    fn apply(&mut self, button: Button, now: Duration) {
        match button {
            Button::Left => {
                self.engine.try_move(-1, 0);
            }
            Button::Right => {
                self.engine.try_move(1, 0);
            }
            Button::SoftDrop => self.soft_drop(now),
            Button::Rotate => {
                if self.engine.rotate() {
                    self.cue(Cue::Rotate);
                }
            }
            Button::HardDrop => self.hard_drop(now),
            Button::Hold => {
                if self.engine.hold() {
                    self.last_gravity = now;
                    self.lock_since = None;
                }
            }
            Button::Pause => {}
        }
    }

    fn soft_drop(&mut self, now: Duration) {
        if self.engine.active().is_none() {
            return;
        }
        if self.engine.try_move(0, 1) {
            let gained = self.score.add_soft_drop(1);
            self.award(gained);
            self.cue(Cue::SoftDrop);
            self.last_gravity = now;
        } else {
            self.update_lock(now);
        }
    }

    fn hard_drop(&mut self, now: Duration) {
        if self.engine.active().is_none() {
            return;
        }
        let distance = self.engine.hard_drop();
        let gained = self.score.add_hard_drop(distance);
        self.award(gained);
        self.cue(Cue::HardDrop);
        self.lock(now);
    }

    fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            _ => {}
        }
    }

    fn award(&mut self, points: u64) {
        if points > 0 {
            self.emit(GameEvent::Score(points));
        }
    }

    fn emit(&mut self, event: GameEvent) {
        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn cue(&mut self, cue: Cue) {
        self.cue_listeners.retain(|tx| tx.send(cue).is_ok());
    }

    fn render(&mut self, now: Duration) {
        if self.surface.is_none() {
            return;
        }
        if self
            .last_render
            .is_some_and(|last| now.saturating_sub(last) < self.config.render_interval)
        {
            return;
        }
        self.last_render = Some(now);
        let scene = Scene::Tetris(self.view());
        if let Some(surface) = self.surface.as_mut() {
            surface.present(scene);
        }
    }
}

impl Game for TetrisGame {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn init(&mut self, surface: Box<dyn Surface>) {
        if self.phase == Phase::Destroyed {
            return;
        }
        self.surface = Some(surface);
        self.reset();
    }

    fn start(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        tracing::debug!("start");
        self.phase = Phase::Running;
        self.reanchor = true;
    }

    fn pause(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.phase = Phase::Paused;
        self.repeat.clear();
    }

    fn resume(&mut self) {
        if self.phase != Phase::Paused {
            return;
        }
        self.phase = Phase::Running;
        self.reanchor = true;
    }

    fn reset(&mut self) {
        if self.phase == Phase::Destroyed {
            return;
        }
        self.engine = Engine::new(self.config.bag());
        self.engine.spawn();
        self.score = Score::new();
        self.phase = Phase::Idle;
        self.repeat.clear();
        self.lock_since = None;
        self.pending_clear = None;
        self.last_render = None;
        self.reanchor = true;
    }

    fn destroy(&mut self) {
        if self.phase == Phase::Destroyed {
            return;
        }
        self.surface = None;
        self.listeners.clear();
        self.cue_listeners.clear();
        self.repeat.clear();
        self.pending_clear = None;
        self.phase = Phase::Destroyed;
    }

    fn frame(&mut self, now: Duration) {
        match self.phase {
            Phase::Destroyed => return,
            Phase::Running => self.step(now),
            Phase::Idle | Phase::Paused | Phase::GameOver => {}
        }
        self.render(now);
    }

    fn input(&mut self, event: InputEvent, now: Duration) {
        match event {
            InputEvent::Release(button) => self.repeat.release(button),
            InputEvent::Press(Button::Pause) => self.toggle_pause(),
            InputEvent::Press(button) => {
                if self.phase != Phase::Running {
                    return;
                }
                if self.repeat.press(button, now) {
                    self.apply(button, now);
                }
            }
        }
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn subscribe(&mut self) -> Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        if self.phase != Phase::Destroyed {
            self.listeners.push(tx);
        }
        rx
    }

    fn audio_cues(&mut self) -> Receiver<Cue> {
        let (tx, rx) = mpsc::channel();
        if self.phase != Phase::Destroyed {
            self.cue_listeners.push(tx);
        }
        rx
    }
}
