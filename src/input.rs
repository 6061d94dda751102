//! Input signals and DAS (Delayed Auto Shift) / ARR (Auto Repeat Rate)
//!
//! Timestamps are injected by the caller as a `Duration` since an arbitrary
//! epoch, so repeat timing is deterministic and testable.

use std::time::Duration;

/// Default Delayed Auto Shift
pub const DEFAULT_DAS: Duration = Duration::from_millis(160);
/// Default Auto Repeat Rate
pub const DEFAULT_ARR: Duration = Duration::from_millis(35);

/// Game buttons, independent of where the signal comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    SoftDrop,
    Rotate,
    HardDrop,
    Hold,
    Pause,
}

impl Button {
    /// Buttons that auto-repeat while held
    pub fn repeats(self) -> bool {
        matches!(self, Button::Left | Button::Right | Button::SoftDrop)
    }
}

/// A press or release of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(Button),
    Release(Button),
}

#[derive(Debug, Clone, Copy)]
struct HoldState {
    pressed_at: Duration,
    das_triggered: bool,
    last_repeat: Duration,
}

impl HoldState {
    fn new(now: Duration) -> Self {
        Self {
            pressed_at: now,
            das_triggered: false,
            last_repeat: now,
        }
    }
}

/// Held-button tracking for the repeating buttons
#[derive(Debug, Clone)]
pub struct AutoRepeat {
    left: Option<HoldState>,
    right: Option<HoldState>,
    down: Option<HoldState>,
    das: Duration,
    arr: Duration,
}

impl Default for AutoRepeat {
    fn default() -> Self {
        Self::new(DEFAULT_DAS, DEFAULT_ARR)
    }
}

impl AutoRepeat {
    pub fn new(das: Duration, arr: Duration) -> Self {
        Self {
            left: None,
            right: None,
            down: None,
            das,
            arr,
        }
    }

    /// Register a press. Returns true when the caller should act immediately
    /// (a fresh press); repeated presses of an already-held button return false.
    ///
    /// Pressing one horizontal direction cancels the other.
    pub fn press(&mut self, button: Button, now: Duration) -> bool {
        match button {
            Button::Left => {
                self.right = None;
                Self::start(&mut self.left, now)
            }
            Button::Right => {
                self.left = None;
                Self::start(&mut self.right, now)
            }
            Button::SoftDrop => Self::start(&mut self.down, now),
            _ => true,
        }
    }

    fn start(slot: &mut Option<HoldState>, now: Duration) -> bool {
        if slot.is_some() {
            return false;
        }
        *slot = Some(HoldState::new(now));
        true
    }

    pub fn release(&mut self, button: Button) {
        match button {
            Button::Left => self.left = None,
            Button::Right => self.right = None,
            Button::SoftDrop => self.down = None,
            _ => {}
        }
    }

    /// Whether a repeating button is currently held
    pub fn is_held(&self, button: Button) -> bool {
        match button {
            Button::Left => self.left.is_some(),
            Button::Right => self.right.is_some(),
            Button::SoftDrop => self.down.is_some(),
            _ => false,
        }
    }

    /// Repeats that are due at `now` (call every frame)
    pub fn update(&mut self, now: Duration) -> Vec<Button> {
        let mut due = Vec::new();
        let (das, arr) = (self.das, self.arr);

        for (slot, button) in [
            (&mut self.left, Button::Left),
            (&mut self.right, Button::Right),
            (&mut self.down, Button::SoftDrop),
        ] {
            if let Some(state) = slot {
                if process_das_arr(state, now, das, arr) {
                    due.push(button);
                }
            }
        }

        due
    }

    /// Forget all held buttons (pause, reset)
    pub fn clear(&mut self) {
        self.left = None;
        self.right = None;
        self.down = None;
    }
}

/// Process DAS/ARR for one held button, returns true if it should fire
fn process_das_arr(state: &mut HoldState, now: Duration, das: Duration, arr: Duration) -> bool {
    let held = now.saturating_sub(state.pressed_at);
    if held < das {
        return false;
    }

    if !state.das_triggered {
        // First repeat once DAS elapses
        state.das_triggered = true;
        state.last_repeat = now;
        return true;
    }

    if now.saturating_sub(state.last_repeat) >= arr {
        state.last_repeat = now;
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fresh_press_acts_once() {
        let mut repeat = AutoRepeat::default();
        assert!(repeat.press(Button::Left, ms(0)));
        assert!(!repeat.press(Button::Left, ms(10)));
        assert!(repeat.is_held(Button::Left));
    }

    #[test]
    fn test_no_repeat_before_das() {
        let mut repeat = AutoRepeat::default();
        repeat.press(Button::Right, ms(0));
        assert!(repeat.update(ms(100)).is_empty());
        assert!(repeat.update(ms(159)).is_empty());
        assert_eq!(repeat.update(ms(160)), vec![Button::Right]);
    }

    #[test]
    fn test_arr_after_das() {
        let mut repeat = AutoRepeat::default();
        repeat.press(Button::Left, ms(0));
        assert_eq!(repeat.update(ms(160)), vec![Button::Left]);
        assert!(repeat.update(ms(180)).is_empty());
        assert_eq!(repeat.update(ms(195)), vec![Button::Left]);
        assert_eq!(repeat.update(ms(230)), vec![Button::Left]);
    }

    #[test]
    fn test_release_stops_repeat() {
        let mut repeat = AutoRepeat::default();
        repeat.press(Button::Left, ms(0));
        repeat.release(Button::Left);
        assert!(repeat.update(ms(500)).is_empty());
        assert!(repeat.press(Button::Left, ms(600)));
    }

    #[test]
    fn test_opposite_direction_cancels() {
        let mut repeat = AutoRepeat::default();
        repeat.press(Button::Left, ms(0));
        assert!(repeat.press(Button::Right, ms(50)));
        assert!(!repeat.is_held(Button::Left));
        // Right charges its own DAS from its press time
        assert!(repeat.update(ms(200)).is_empty());
        assert_eq!(repeat.update(ms(210)), vec![Button::Right]);
    }

    #[test]
    fn test_soft_drop_repeats_alongside_shift() {
        let mut repeat = AutoRepeat::default();
        repeat.press(Button::Left, ms(0));
        repeat.press(Button::SoftDrop, ms(0));
        assert_eq!(repeat.update(ms(160)), vec![Button::Left, Button::SoftDrop]);
    }

    #[test]
    fn test_non_repeating_buttons_always_act() {
        let mut repeat = AutoRepeat::default();
        assert!(repeat.press(Button::Rotate, ms(0)));
        assert!(repeat.press(Button::Rotate, ms(1)));
        assert!(!repeat.is_held(Button::Rotate));
        assert!(!Button::HardDrop.repeats());
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut repeat = AutoRepeat::default();
        repeat.press(Button::Left, ms(0));
        repeat.press(Button::SoftDrop, ms(0));
        repeat.clear();
        assert!(repeat.update(ms(1000)).is_empty());
    }
}
