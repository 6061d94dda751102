//! Game screen: mounts a game, keeps the HUD score and handles the end of a run
//!
//! The screen owns the receiving ends of the game's channels and drains them
//! once per host frame. Score shown in the HUD is accumulated from score
//! events rather than read from the game.

use crate::settings::Settings;
use arcade::{Cue, Game, GameEvent, GameInfo, InputEvent, Phase, Scene, TetrisView};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

/// How a finished run compares with the stored best
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub score: u64,
    pub best: u64,
    pub new_best: bool,
}

impl Outcome {
    pub fn message(&self) -> String {
        if self.new_best {
            format!(
                "Yess! New best score: {} 🎉 Now try to beat this one. Hit Play Again.",
                self.score
            )
        } else {
            format!(
                "Wooo! You scored {} but didn't beat your best {}. Click Play Again and crush it.",
                self.score, self.best
            )
        }
    }
}

/// Buttons on the game-over overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    PlayAgain,
    Share,
    /// Copy an invitation instead of the score
    Invite,
    Back,
}

impl OverlayAction {
    pub const ALL: [OverlayAction; 4] = [
        OverlayAction::PlayAgain,
        OverlayAction::Share,
        OverlayAction::Invite,
        OverlayAction::Back,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OverlayAction::PlayAgain => "Play Again",
            OverlayAction::Share => "Share",
            OverlayAction::Invite => "Invite",
            OverlayAction::Back => "Back",
        }
    }
}

/// What happened during one host frame
#[derive(Debug, Default)]
pub struct Tick {
    pub cues: Vec<Cue>,
    /// Set on the frame the run ended
    pub finished: Option<Outcome>,
}

pub struct GameScreen {
    pub info: GameInfo,
    game: Box<dyn Game>,
    scenes: Receiver<Scene>,
    events: Receiver<GameEvent>,
    cues: Receiver<Cue>,
    /// Latest presented scene
    pub view: Option<TetrisView>,
    pub score: u64,
    pub best: u64,
    pub outcome: Option<Outcome>,
    pub overlay_selected: usize,
    /// Transient status line (clipboard result)
    pub notice: Option<String>,
    share_override: Option<String>,
}

impl GameScreen {
    /// Load, mount and start a game; None for an unknown id
    pub fn open(id: &str, settings: &Settings) -> Option<Self> {
        let info = *arcade::find(id)?;
        let mut game = arcade::load_game(id, &settings.gameplay.game_config())?;

        let (tx, scenes) = mpsc::channel();
        game.init(Box::new(tx));
        let events = game.subscribe();
        let cues = game.audio_cues();
        game.start();
        tracing::info!(target: "arcade::analytics", id = info.id, "game_start");

        Some(Self {
            info,
            game,
            scenes,
            events,
            cues,
            view: None,
            score: 0,
            best: settings.best_score(info.id).unwrap_or(0),
            outcome: None,
            overlay_selected: 0,
            notice: None,
            share_override: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.game.phase()
    }

    /// Advance the game and drain its channels
    pub fn tick(&mut self, now: Duration, settings: &mut Settings) -> Tick {
        self.game.frame(now);

        if let Some(Scene::Tetris(view)) = self.scenes.try_iter().last() {
            self.view = Some(view);
        }

        let mut tick = Tick {
            cues: self.cues.try_iter().collect(),
            finished: None,
        };

        for event in self.events.try_iter().collect::<Vec<_>>() {
            match event {
                GameEvent::Score(points) => self.score += points,
                GameEvent::GameOver => tick.finished = Some(self.finish(settings)),
                GameEvent::SharePayload(text) => {
                    tracing::debug!("share payload: {}", text);
                    self.share_override = Some(text);
                }
            }
        }
        tick
    }

    fn finish(&mut self, settings: &mut Settings) -> Outcome {
        let new_best = settings.record_score(self.info.id, self.score);
        self.best = settings.best_score(self.info.id).unwrap_or(0);
        let outcome = Outcome {
            score: self.score,
            best: self.best,
            new_best,
        };
        tracing::info!(
            target: "arcade::analytics",
            id = self.info.id,
            score = self.score,
            new_best,
            "game_end"
        );
        self.overlay_selected = 0;
        self.outcome = Some(outcome.clone());
        outcome
    }

    /// Forward gameplay input; ignored once the run is over
    pub fn input(&mut self, event: InputEvent, now: Duration) {
        if self.outcome.is_none() {
            self.game.input(event, now);
        }
    }

    /// Fresh run on the same screen, from the overlay or mid-run
    pub fn restart(&mut self) {
        self.game.reset();
        self.game.start();
        // stale events from the old run must not leak into the new score
        let _ = self.events.try_iter().count();
        self.score = 0;
        self.outcome = None;
        self.notice = None;
        self.overlay_selected = 0;
    }

    pub fn overlay_move(&mut self, forward: bool) {
        let len = OverlayAction::ALL.len();
        self.overlay_selected = if forward {
            (self.overlay_selected + 1) % len
        } else {
            (self.overlay_selected + len - 1) % len
        };
    }

    pub fn overlay_action(&self) -> Option<OverlayAction> {
        self.outcome.as_ref()?;
        OverlayAction::ALL.get(self.overlay_selected).copied()
    }

    pub fn share_text(&self) -> String {
        match &self.share_override {
            Some(text) => text.clone(),
            None => format!(
                "Just scored {} in {} at Nostalgia Arcade! Can you beat me? 🎮",
                self.score, self.info.name
            ),
        }
    }

    pub fn invite_text(&self) -> String {
        format!(
            "I'm just loving the {} game at Nostalgia Arcade! Do you also want to play?",
            self.info.name
        )
    }

    /// Unmount; the game releases its surface and listeners
    pub fn close(mut self) {
        self.game.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade::Button;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn open() -> (GameScreen, Settings) {
        let settings = Settings::default();
        let screen = GameScreen::open("tetris", &settings).unwrap();
        (screen, settings)
    }

    /// Hard drop until the stack tops out
    fn play_to_game_over(screen: &mut GameScreen, settings: &mut Settings) -> Outcome {
        let mut now = 0;
        for _ in 0..500 {
            now += 20;
            screen.input(InputEvent::Press(Button::HardDrop), ms(now));
            screen.input(InputEvent::Release(Button::HardDrop), ms(now));
            now += 200;
            if let Some(outcome) = screen.tick(ms(now), settings).finished {
                return outcome;
            }
        }
        panic!("never topped out");
    }

    #[test]
    fn test_unknown_game_does_not_open() {
        assert!(GameScreen::open("snake", &Settings::default()).is_none());
    }

    #[test]
    fn test_open_starts_and_presents() {
        let (mut screen, mut settings) = open();
        assert_eq!(screen.phase(), Phase::Running);
        screen.tick(ms(0), &mut settings);
        assert!(screen.view.is_some());
    }

    #[test]
    fn test_score_accumulates_from_events() {
        let (mut screen, mut settings) = open();
        screen.tick(ms(0), &mut settings);
        screen.input(InputEvent::Press(Button::HardDrop), ms(10));
        let tick = screen.tick(ms(20), &mut settings);
        assert!(screen.score > 0);
        assert!(tick.cues.contains(&Cue::HardDrop));
    }

    #[test]
    fn test_game_over_records_best_once() {
        let (mut screen, mut settings) = open();
        let outcome = play_to_game_over(&mut screen, &mut settings);
        assert!(outcome.new_best);
        assert_eq!(settings.best_score("tetris"), Some(outcome.score));
        assert!(outcome.message().contains("New best"));
        assert_eq!(screen.overlay_action(), Some(OverlayAction::PlayAgain));

        // a worse run does not overwrite the best
        screen.restart();
        assert_eq!(screen.score, 0);
        assert!(screen.outcome.is_none());
        settings.best_scores.insert("tetris".into(), u64::MAX);
        let second = play_to_game_over(&mut screen, &mut settings);
        assert!(!second.new_best);
        assert_eq!(second.best, u64::MAX);
        assert!(second.message().contains("didn't beat"));
    }

    #[test]
    fn test_share_text_defaults_to_score() {
        let (mut screen, _settings) = open();
        screen.score = 1200;
        assert_eq!(
            screen.share_text(),
            "Just scored 1200 in Tetris at Nostalgia Arcade! Can you beat me? 🎮"
        );
    }

    #[test]
    fn test_overlay_navigation_wraps() {
        let (mut screen, _settings) = open();
        assert_eq!(screen.overlay_action(), None);
        screen.outcome = Some(Outcome {
            score: 0,
            best: 0,
            new_best: false,
        });
        screen.overlay_move(false);
        assert_eq!(screen.overlay_action(), Some(OverlayAction::Back));
        screen.overlay_move(true);
        assert_eq!(screen.overlay_action(), Some(OverlayAction::PlayAgain));
    }

    #[test]
    fn test_pause_toggles_through_game() {
        let (mut screen, _settings) = open();
        screen.input(InputEvent::Press(Button::Pause), ms(5));
        assert_eq!(screen.phase(), Phase::Paused);
        screen.input(InputEvent::Press(Button::Pause), ms(6));
        assert_eq!(screen.phase(), Phase::Running);
    }

    #[test]
    fn test_restart_mid_run() {
        let (mut screen, mut settings) = open();
        screen.tick(ms(0), &mut settings);
        screen.input(InputEvent::Press(Button::HardDrop), ms(10));
        screen.tick(ms(20), &mut settings);
        assert!(screen.score > 0);
        screen.input(InputEvent::Press(Button::Pause), ms(30));
        assert_eq!(screen.phase(), Phase::Paused);

        screen.restart();
        assert_eq!(screen.score, 0);
        assert_eq!(screen.phase(), Phase::Running);
        assert!(screen.outcome.is_none());
        screen.tick(ms(40), &mut settings);
        assert_eq!(screen.score, 0);
        assert_eq!(screen.view.as_ref().map(|v| v.score), Some(0));
    }

    #[test]
    fn test_share_payload_overrides_text() {
        let (mut screen, mut settings) = open();
        screen.score = 300;
        screen.tick(ms(0), &mut settings);
        assert!(screen.share_text().starts_with("Just scored 300"));

        let (tx, rx) = mpsc::channel();
        screen.events = rx;
        tx.send(GameEvent::SharePayload("custom brag".to_string())).unwrap();
        screen.tick(ms(20), &mut settings);
        assert_eq!(screen.share_text(), "custom brag");
        assert_eq!(
            screen.invite_text(),
            "I'm just loving the Tetris game at Nostalgia Arcade! Do you also want to play?"
        );
    }
}
