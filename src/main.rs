//! Nostalgia Arcade - terminal host
//!
//! Routes between the home screen and game screens, renders, plays sound and
//! persists settings. The games themselves live in the library crate.

// Allow unreachable patterns due to #[non_exhaustive] enums for future compatibility
#![allow(unreachable_patterns)]

mod audio;
mod keys;
mod menu;
mod router;
mod screen;
mod settings;
mod ui;

use anyhow::{Context, Result};
use arcade::{Button, InputEvent, Phase};
use audio::{AudioManager, Sfx};
use copypasta::{ClipboardContext, ClipboardProvider};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use keys::{Command, KeyBindings, KeyTracker};
use menu::{Menu, MenuAction, SettingKey};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Position, Rect},
};
use router::Route;
use screen::{GameScreen, OverlayAction, Tick};
use settings::Settings;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing_subscriber::filter::Directive;

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Application state
enum AppState {
    Home(Menu),
    Playing(GameScreen),
}

/// Everything the host loop owns besides the terminal
struct App {
    state: AppState,
    settings: Settings,
    audio: Option<AudioManager>,
    keys: KeyTracker,
    started: Instant,
}

/// Get the arcade temp directory, creating it if needed
fn arcade_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("arcade");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Cross-platform clipboard write
fn clipboard_set(text: &str) -> Result<()> {
    // On Linux, try wl-clipboard-rs first (works for terminal apps on Wayland)
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        use wl_clipboard_rs::copy::{MimeType, Options, Source};
        let opts = Options::new();
        match opts.copy(Source::Bytes(text.as_bytes().into()), MimeType::Text) {
            Ok(_) => {
                tracing::info!("Copied to clipboard via wl-clipboard-rs");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!("wl-clipboard-rs failed (maybe X11?): {}", e);
            }
        }
    }

    // Fallback to copypasta (works on X11, macOS, Windows)
    let mut ctx = ClipboardContext::new()
        .map_err(|e| anyhow::anyhow!("clipboard unavailable: {}", e))?;
    ctx.set_contents(text.to_owned())
        .map_err(|e| anyhow::anyhow!("clipboard write failed: {}", e))?;
    tracing::info!("Copied to clipboard via copypasta");
    Ok(())
}

fn main() -> Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    let log_dir = arcade_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file; stdout belongs to the UI
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("arcade=debug".parse::<Directive>()?),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "arcade starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();
    let route = Route::parse(&std::env::args().nth(1).unwrap_or_default());

    // Optional - the arcade works without audio
    let audio = AudioManager::new(settings.audio.gain());

    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;

    // Real key releases when the terminal can report them
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    tracing::debug!(enhanced, "keyboard enhancement");

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App {
        keys: KeyTracker::new(KeyBindings::from_settings(&settings), enhanced),
        state: AppState::Home(Menu::new(&settings)),
        settings,
        audio,
        started: Instant::now(),
    };
    app.navigate(route);

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    if enhanced {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = app.settings.save() {
        eprintln!("Warning: Could not save settings: {:#}", e);
    }

    if result.is_ok() {
        println!("\nThanks for visiting Nostalgia Arcade!");
    }
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| match &app.state {
            AppState::Home(menu) => ui::render_home(frame, menu, &app.settings),
            AppState::Playing(screen) => ui::render_game(frame, screen, &app.settings),
        })?;

        if event::poll(FRAME_DURATION)? {
            let keep_running = match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    app.handle_mouse(mouse, Rect::new(0, 0, size.width, size.height));
                    true
                }
                _ => true,
            };
            if !keep_running {
                return Ok(());
            }
        }

        app.update();
    }
}

impl App {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn navigate(&mut self, route: Route) {
        let route = if route.is_playable() {
            route
        } else {
            tracing::warn!("no game at {}, going home", route);
            Route::Home
        };
        tracing::debug!("navigate to {}", route.path());
        if let AppState::Playing(_) = self.state {
            self.leave_game();
        }

        match route {
            // already home; leave_game restored the menu with the cursor on the game
            Route::Home => {}
            Route::Game(id) => match GameScreen::open(&id, &self.settings) {
                Some(screen) => {
                    self.keys.clear();
                    self.state = AppState::Playing(screen);
                    self.start_music();
                }
                None => {
                    tracing::warn!("unknown game {:?}, going home", id);
                    self.state = AppState::Home(Menu::new(&self.settings));
                }
            },
        }
    }

    fn leave_game(&mut self) {
        let state = std::mem::replace(&mut self.state, AppState::Home(Menu::new(&self.settings)));
        if let AppState::Playing(screen) = state {
            let id = screen.info.id;
            screen.close();
            if let AppState::Home(menu) = &mut self.state {
                menu.focus_game(id);
            }
        }
        self.keys.clear();
        if let Some(audio) = &mut self.audio {
            audio.stop_music();
        }
    }

    fn start_music(&mut self) {
        if !self.settings.audio.music {
            return;
        }
        if let Some(audio) = &mut self.audio {
            audio.start_music();
        }
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save() {
            tracing::warn!("could not save settings: {:#}", e);
        }
    }

    /// Returns false to quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let now = self.now();
        match &mut self.state {
            AppState::Home(_) => {
                if key.kind == KeyEventKind::Release {
                    return true;
                }
                self.handle_home_key(key)
            }
            AppState::Playing(screen) => {
                if key.kind == KeyEventKind::Release {
                    if let Some(release) = self.keys.key_up(key) {
                        screen.input(release, now);
                    }
                    return true;
                }

                if screen.outcome.is_some() && !matches!(key.code, KeyCode::Char(_) | KeyCode::Esc) {
                    return self.handle_overlay_key(key.code);
                }

                match self.keys.key_down(key, now) {
                    Some(Command::Play(button)) => {
                        if screen.outcome.is_none() {
                            screen.input(InputEvent::Press(button), now);
                        }
                        true
                    }
                    Some(Command::ToggleMute) => {
                        self.settings.audio.muted = !self.settings.audio.muted;
                        self.apply_audio_settings();
                        self.save_settings();
                        true
                    }
                    Some(Command::Restart) => {
                        tracing::debug!("restart mid-run");
                        screen.restart();
                        self.keys.clear();
                        self.start_music();
                        true
                    }
                    Some(Command::Back) => {
                        self.navigate(Route::Home);
                        true
                    }
                    Some(Command::Quit) => false,
                    None => true,
                }
            }
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> bool {
        let AppState::Home(menu) = &mut self.state else {
            return true;
        };
        let action = match key.code {
            KeyCode::Up => {
                menu.move_up();
                None
            }
            KeyCode::Down => {
                menu.move_down();
                None
            }
            KeyCode::Left => menu.adjust(false, &mut self.settings),
            KeyCode::Right => menu.adjust(true, &mut self.settings),
            KeyCode::Enter | KeyCode::Char(' ') => menu.select(&mut self.settings),
            KeyCode::Char('q') | KeyCode::Esc => Some(MenuAction::Quit),
            KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                Some(MenuAction::Quit)
            }
            _ => None,
        };

        match action {
            Some(MenuAction::Play(id)) => {
                self.navigate(Route::Game(id.to_string()));
                true
            }
            Some(MenuAction::SettingChanged(key)) => {
                if matches!(key, SettingKey::Muted | SettingKey::Volume | SettingKey::Music) {
                    self.apply_audio_settings();
                }
                self.save_settings();
                true
            }
            Some(MenuAction::Quit) => false,
            _ => true,
        }
    }

    fn handle_overlay_key(&mut self, code: KeyCode) -> bool {
        let AppState::Playing(screen) = &mut self.state else {
            return true;
        };
        match code {
            KeyCode::Left | KeyCode::Up | KeyCode::BackTab => screen.overlay_move(false),
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => screen.overlay_move(true),
            KeyCode::Enter => match screen.overlay_action() {
                Some(OverlayAction::PlayAgain) => {
                    screen.restart();
                    self.keys.clear();
                    self.start_music();
                }
                Some(action @ (OverlayAction::Share | OverlayAction::Invite)) => {
                    let text = if action == OverlayAction::Share {
                        screen.share_text()
                    } else {
                        screen.invite_text()
                    };
                    tracing::info!(
                        target: "arcade::analytics",
                        id = screen.info.id,
                        score = screen.score,
                        action = action.label(),
                        "share_clicked"
                    );
                    screen.notice = Some(match clipboard_set(&text) {
                        Ok(()) => "Copied to clipboard!".to_string(),
                        Err(e) => {
                            tracing::warn!("share failed: {:#}", e);
                            "Could not reach the clipboard".to_string()
                        }
                    });
                }
                Some(OverlayAction::Back) => self.navigate(Route::Home),
                None => {}
            },
            _ => {}
        }
        true
    }

    /// Left click on the board rotates
    fn handle_mouse(&mut self, mouse: MouseEvent, area: Rect) {
        let AppState::Playing(screen) = &mut self.state else {
            return;
        };
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || screen.outcome.is_some() {
            return;
        }
        if ui::board_area(area).contains(Position::new(mouse.column, mouse.row)) {
            let now = self.started.elapsed();
            screen.input(InputEvent::Press(Button::Rotate), now);
            screen.input(InputEvent::Release(Button::Rotate), now);
        }
    }

    fn apply_audio_settings(&mut self) {
        let gain = self.settings.audio.gain();
        let music = self.settings.audio.music;
        let playing = matches!(self.state, AppState::Playing(_));
        if let Some(audio) = &mut self.audio {
            audio.set_gain(gain);
            if !music {
                audio.stop_music();
            } else if playing {
                audio.start_music();
            }
        }
    }

    /// Per-frame work: synthesized releases, game frame, sound, end of run
    fn update(&mut self) {
        let now = self.now();
        let AppState::Playing(screen) = &mut self.state else {
            return;
        };

        for release in self.keys.expired(now) {
            screen.input(release, now);
        }

        let Tick { cues, finished } = screen.tick(now, &mut self.settings);
        let phase = screen.phase();

        if let Some(audio) = &self.audio {
            for cue in cues {
                audio.play_cue(cue);
            }
            match phase {
                Phase::Paused => audio.pause_music(),
                Phase::Running => audio.resume_music(),
                _ => {}
            }
        }

        if let Some(outcome) = finished {
            tracing::info!(score = outcome.score, new_best = outcome.new_best, "run finished");
            self.keys.clear();
            if let Some(audio) = &mut self.audio {
                audio.stop_music();
                audio.play_sfx(Sfx::GameOver);
            }
            if outcome.new_best {
                self.save_settings();
            }
        }
    }
}
