//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/arcade/settings.toml (or platform equivalent)

use anyhow::{Context, Result};
use arcade::GameConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Arcade settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keys: KeyBindings,
    pub gameplay: GameplaySettings,
    pub audio: AudioSettings,
    /// Best score per game id
    pub best_scores: BTreeMap<String, u64>,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub soft_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hard_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hold: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub pause: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub mute: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub back: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub restart: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a key name or an array of key names")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    match keys {
        [single] => serializer.serialize_str(single),
        _ => {
            let mut seq = serializer.serialize_seq(Some(keys.len()))?;
            for key in keys {
                seq.serialize_element(key)?;
            }
            seq.end()
        }
    }
}

/// Gameplay timings, all in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Delayed Auto Shift
    pub das_ms: u64,
    /// Auto Repeat Rate
    pub arr_ms: u64,
    pub lock_delay_ms: u64,
    /// Flash time for full rows
    pub line_clear_ms: u64,
    pub show_ghost: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0-100)
    pub volume: u32,
    pub muted: bool,
    /// Background arpeggio on/off
    pub music: bool,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string(), "a".to_string()],
            move_right: vec!["Right".to_string(), "d".to_string()],
            soft_drop: vec!["Down".to_string(), "s".to_string()],
            hard_drop: vec!["Space".to_string()],
            rotate: vec!["Up".to_string(), "w".to_string()],
            hold: vec!["c".to_string(), "Shift".to_string()],
            pause: vec!["p".to_string()],
            mute: vec!["m".to_string()],
            back: vec!["Esc".to_string(), "q".to_string()],
            restart: vec!["r".to_string()],
        }
    }
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            das_ms: 160,
            arr_ms: 35,
            lock_delay_ms: 500,
            line_clear_ms: 140,
            show_ghost: true,
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 50,
            muted: false,
            music: true,
        }
    }
}

impl GameplaySettings {
    /// Core game timings; the bag is seeded from entropy
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            das: Duration::from_millis(self.das_ms),
            arr: Duration::from_millis(self.arr_ms),
            lock_delay: Duration::from_millis(self.lock_delay_ms),
            line_clear_delay: Duration::from_millis(self.line_clear_ms),
            ..GameConfig::default()
        }
    }
}

impl AudioSettings {
    /// Effective gain in 0.0..=1.0
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume.min(100) as f32 / 100.0
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "nostalgia", "arcade").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Load settings from file, or fall back to defaults
    pub fn load() -> Self {
        let Some(dir) = Self::config_dir() else {
            return Self::default();
        };
        let path = dir.join("settings.toml");

        match fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) => {
                tracing::debug!("no settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings text; malformed files yield defaults
    pub fn parse(contents: &str) -> Self {
        toml::from_str(contents).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed settings: {}", e);
            Self::default()
        })
    }

    /// Save settings to file
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir().context("could not determine config directory")?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let contents = toml::to_string_pretty(self).context("failed to serialize settings")?;
        let path = dir.join("settings.toml");
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Best score recorded for a game
    pub fn best_score(&self, game_id: &str) -> Option<u64> {
        self.best_scores.get(game_id).copied()
    }

    /// Record a finished run; returns true when it beats the stored best.
    ///
    /// A game with no stored best counts as 0, so a zero score is never a best.
    pub fn record_score(&mut self, game_id: &str, score: u64) -> bool {
        if score <= self.best_score(game_id).unwrap_or(0) {
            return false;
        }
        self.best_scores.insert(game_id.to_string(), score);
        true
    }
}
