//! Terminal key mapping
//!
//! Translates crossterm key events into arcade commands through the
//! configured bindings. Terminals without the keyboard enhancement protocol
//! never report releases, so held buttons are considered released once no
//! press (or terminal auto-repeat) has been seen for [`KEY_TIMEOUT`].

use crate::settings::Settings;
use arcade::{Button, InputEvent};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};
use std::time::Duration;

/// Time after which we consider a key "released" if no repeat received
pub const KEY_TIMEOUT: Duration = Duration::from_millis(100);

/// What a key does on the game screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play(Button),
    ToggleMute,
    /// Throw away the current run and start over
    Restart,
    Back,
    Quit,
}

/// Key bindings - supports multiple keys per command
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<(KeyCode, Command)>,
}

/// Parse a key name from the settings file
pub fn parse_key(s: &str) -> Option<KeyCode> {
    let code = match s.to_lowercase().as_str() {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "space" => KeyCode::Char(' '),
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "esc" | "escape" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "shift" => KeyCode::Modifier(ModifierKeyCode::LeftShift),
        "ctrl" | "control" => KeyCode::Modifier(ModifierKeyCode::LeftControl),
        "alt" => KeyCode::Modifier(ModifierKeyCode::LeftAlt),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}

impl KeyBindings {
    /// Create keybindings from settings, skipping names that do not parse
    pub fn from_settings(settings: &Settings) -> Self {
        let keys = &settings.keys;
        let groups: [(&[String], Command); 10] = [
            (&keys.move_left, Command::Play(Button::Left)),
            (&keys.move_right, Command::Play(Button::Right)),
            (&keys.soft_drop, Command::Play(Button::SoftDrop)),
            (&keys.hard_drop, Command::Play(Button::HardDrop)),
            (&keys.rotate, Command::Play(Button::Rotate)),
            (&keys.hold, Command::Play(Button::Hold)),
            (&keys.pause, Command::Play(Button::Pause)),
            (&keys.mute, Command::ToggleMute),
            (&keys.back, Command::Back),
            (&keys.restart, Command::Restart),
        ];

        let mut bindings = Vec::new();
        for (names, command) in groups {
            for name in names {
                match parse_key(name) {
                    Some(code) => bindings.push((normalize_key(code), command)),
                    None => tracing::warn!("unknown key name {:?} ignored", name),
                }
            }
        }
        Self { bindings }
    }

    /// First command bound to a key
    pub fn lookup(&self, code: KeyCode) -> Option<Command> {
        let code = normalize_key(code);
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == code)
            .map(|&(_, command)| command)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Tracks held buttons so releases reach the game
#[derive(Debug, Clone)]
pub struct KeyTracker {
    bindings: KeyBindings,
    /// Held buttons and when they were last reported
    held: Vec<(Button, Duration)>,
    /// Terminal reports real release events
    reports_release: bool,
}

impl KeyTracker {
    pub fn new(bindings: KeyBindings, reports_release: bool) -> Self {
        Self {
            bindings,
            held: Vec::new(),
            reports_release,
        }
    }

    /// Handle a key press (or terminal repeat)
    pub fn key_down(&mut self, key: KeyEvent, now: Duration) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let command = self.bindings.lookup(key.code)?;
        if let Command::Play(button) = command {
            if button.repeats() {
                match self.held.iter_mut().find(|(held, _)| *held == button) {
                    Some((_, seen)) => *seen = now,
                    None => self.held.push((button, now)),
                }
            }
        }
        Some(command)
    }

    /// Handle a real key release
    pub fn key_up(&mut self, key: KeyEvent) -> Option<InputEvent> {
        let Some(Command::Play(button)) = self.bindings.lookup(key.code) else {
            return None;
        };
        self.held.retain(|(held, _)| *held != button);
        Some(InputEvent::Release(button))
    }

    /// Synthesized releases for keys that went quiet (call every frame)
    pub fn expired(&mut self, now: Duration) -> Vec<InputEvent> {
        if self.reports_release {
            return Vec::new();
        }
        let mut released = Vec::new();
        self.held.retain(|&(button, seen)| {
            let alive = now.saturating_sub(seen) <= KEY_TIMEOUT;
            if !alive {
                released.push(InputEvent::Release(button));
            }
            alive
        });
        released
    }

    /// Forget held buttons (leaving the game screen, restarting)
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        KeyCode::Modifier(ModifierKeyCode::RightShift) => KeyCode::Modifier(ModifierKeyCode::LeftShift),
        other => other,
    }
}
