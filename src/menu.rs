//! Home screen: game catalog plus a few quick settings

use crate::settings::Settings;
use arcade::GameInfo;

/// Home screen state
#[derive(Debug, Clone)]
pub struct Menu {
    pub selected: usize,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub item_type: MenuItemType,
}

#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum MenuItemType {
    /// A catalog entry
    Game(GameInfo),
    /// Toggle boolean setting
    Toggle { key: SettingKey, value: bool },
    /// Numeric value with increment/decrement
    Number { key: SettingKey, value: u64, min: u64, max: u64, step: u64 },
    Quit,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Navigate to `/game/:id`
    Play(&'static str),
    /// A setting changed and should be persisted/applied
    SettingChanged(SettingKey),
    Quit,
}

/// Setting keys for identifying which setting to modify
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    ShowGhost,
    Muted,
    Music,
    Volume,
}

impl Menu {
    pub fn new(settings: &Settings) -> Self {
        let mut items: Vec<MenuItem> = arcade::catalog()
            .iter()
            .map(|info| MenuItem {
                label: info.name.to_string(),
                item_type: MenuItemType::Game(*info),
            })
            .collect();

        items.extend([
            MenuItem {
                label: "Ghost Piece".to_string(),
                item_type: MenuItemType::Toggle {
                    key: SettingKey::ShowGhost,
                    value: settings.gameplay.show_ghost,
                },
            },
            MenuItem {
                label: "Music".to_string(),
                item_type: MenuItemType::Toggle {
                    key: SettingKey::Music,
                    value: settings.audio.music,
                },
            },
            MenuItem {
                label: "Mute".to_string(),
                item_type: MenuItemType::Toggle {
                    key: SettingKey::Muted,
                    value: settings.audio.muted,
                },
            },
            MenuItem {
                label: "Volume".to_string(),
                item_type: MenuItemType::Number {
                    key: SettingKey::Volume,
                    value: settings.audio.volume as u64,
                    min: 0,
                    max: 100,
                    step: 10,
                },
            },
            MenuItem {
                label: "Quit".to_string(),
                item_type: MenuItemType::Quit,
            },
        ]);

        Self { selected: 0, items }
    }

    /// Index of a game's entry, to restore the cursor when coming back
    pub fn focus_game(&mut self, id: &str) {
        if let Some(index) = self
            .items
            .iter()
            .position(|item| matches!(&item.item_type, MenuItemType::Game(info) if info.id == id))
        {
            self.selected = index;
        }
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len().saturating_sub(1);
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        } else {
            self.selected = 0;
        }
    }

    /// Handle left/right for toggles and numbers
    pub fn adjust(&mut self, increase: bool, settings: &mut Settings) -> Option<MenuAction> {
        let item = self.items.get_mut(self.selected)?;
        match &mut item.item_type {
            MenuItemType::Toggle { key, value } => {
                *value = !*value;
                apply_setting(settings, *key, SettingValue::Bool(*value));
                Some(MenuAction::SettingChanged(*key))
            }
            MenuItemType::Number { key, value, min, max, step } => {
                *value = if increase {
                    (*value + *step).min(*max)
                } else {
                    value.saturating_sub(*step).max(*min)
                };
                apply_setting(settings, *key, SettingValue::Number(*value));
                Some(MenuAction::SettingChanged(*key))
            }
            _ => None,
        }
    }

    /// Enter on the current selection
    pub fn select(&mut self, settings: &mut Settings) -> Option<MenuAction> {
        let item = self.items.get(self.selected)?;
        match &item.item_type {
            MenuItemType::Game(info) => Some(MenuAction::Play(info.id)),
            MenuItemType::Quit => Some(MenuAction::Quit),
            MenuItemType::Toggle { .. } => self.adjust(true, settings),
            _ => None,
        }
    }
}

/// Helper enum for setting values
enum SettingValue {
    Bool(bool),
    Number(u64),
}

/// Apply a setting change to the Settings struct
fn apply_setting(settings: &mut Settings, key: SettingKey, value: SettingValue) {
    match (key, value) {
        (SettingKey::ShowGhost, SettingValue::Bool(v)) => settings.gameplay.show_ghost = v,
        (SettingKey::Muted, SettingValue::Bool(v)) => settings.audio.muted = v,
        (SettingKey::Music, SettingValue::Bool(v)) => settings.audio.music = v,
        (SettingKey::Volume, SettingValue::Number(v)) => settings.audio.volume = v.min(100) as u32,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_comes_first() {
        let menu = Menu::new(&Settings::default());
        assert!(matches!(
            &menu.items[0].item_type,
            MenuItemType::Game(info) if info.id == "tetris"
        ));
        assert!(matches!(
            menu.items.last().map(|i| &i.item_type),
            Some(MenuItemType::Quit)
        ));
    }

    #[test]
    fn test_select_game_navigates() {
        let mut settings = Settings::default();
        let mut menu = Menu::new(&settings);
        assert_eq!(menu.select(&mut settings), Some(MenuAction::Play("tetris")));
    }

    #[test]
    fn test_navigation_wraps() {
        let settings = Settings::default();
        let mut menu = Menu::new(&settings);
        menu.move_up();
        assert_eq!(menu.selected, menu.items.len() - 1);
        menu.move_down();
        assert_eq!(menu.selected, 0);
    }

    #[test]
    fn test_toggle_and_volume_update_settings() {
        let mut settings = Settings::default();
        let mut menu = Menu::new(&settings);

        let mute = menu
            .items
            .iter()
            .position(|i| matches!(i.item_type, MenuItemType::Toggle { key: SettingKey::Muted, .. }))
            .unwrap();
        menu.selected = mute;
        assert_eq!(
            menu.select(&mut settings),
            Some(MenuAction::SettingChanged(SettingKey::Muted))
        );
        assert!(settings.audio.muted);

        menu.move_down();
        for _ in 0..10 {
            menu.adjust(true, &mut settings);
        }
        assert_eq!(settings.audio.volume, 100);
        menu.adjust(false, &mut settings);
        assert_eq!(settings.audio.volume, 90);
    }

    #[test]
    fn test_focus_game_restores_cursor() {
        let mut menu = Menu::new(&Settings::default());
        menu.move_up();
        menu.focus_game("tetris");
        assert_eq!(menu.selected, 0);
    }
}
