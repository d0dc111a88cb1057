//! TOML-based user preferences.
//!
//! Stored at `~/.config/nisba/config.toml`. Every key is independent and
//! falls back to its own default when absent.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::data_dir;
use crate::audio::AmbientSound;
use crate::daily::Language;
use crate::error::ConfigError;
use crate::timer::{MAX_WORK_MINUTES, MIN_WORK_MINUTES, WORK_MINUTES_STEP};

/// Every settable key, in file order.
pub const PREFERENCE_KEYS: [&str; 9] = [
    "language",
    "theme",
    "work_minutes",
    "sound",
    "volume",
    "auto_break",
    "ui_sounds",
    "ui_volume",
    "welcome_seen",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub theme: Theme,
    /// Focus length in minutes. Breaks derive from it.
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    /// Ambient loop played during sessions.
    #[serde(default)]
    pub sound: AmbientSound,
    /// Ambient and session-end volume, 0-100.
    #[serde(default = "default_volume")]
    pub volume: u8,
    /// Start the next phase automatically when one completes.
    #[serde(default)]
    pub auto_break: bool,
    #[serde(default = "default_true")]
    pub ui_sounds: bool,
    #[serde(default = "default_ui_volume")]
    pub ui_volume: u8,
    #[serde(default)]
    pub welcome_seen: bool,
}

fn default_work_minutes() -> u32 {
    25
}
fn default_volume() -> u8 {
    50
}
fn default_ui_volume() -> u8 {
    40
}
fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: Language::default(),
            theme: Theme::default(),
            work_minutes: default_work_minutes(),
            sound: AmbientSound::default(),
            volume: default_volume(),
            auto_break: false,
            ui_sounds: true,
            ui_volume: default_ui_volume(),
            welcome_seen: false,
        }
    }
}

impl Preferences {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .trim()
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => value
                    .trim()
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                _ => serde_json::Value::String(value.trim().into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// `~/.config/nisba/config.toml`
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first run.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// defaults cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let table: toml::Table =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                let mut prefs = Self::from_table(table);
                prefs.sanitize();
                Ok(prefs)
            }
            Err(_) => {
                let prefs = Self::default();
                prefs.save_to(path)?;
                Ok(prefs)
            }
        }
    }

    /// Load, falling back to defaults when the file is unreadable.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!("using default preferences: {e}");
            Self::default()
        })
    }

    pub fn load_or_default_from(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            warn!("using default preferences: {e}");
            Self::default()
        })
    }

    /// Decode a parsed file one key at a time. A value that does not
    /// decode leaves that key at its default; the other keys still load.
    fn from_table(table: toml::Table) -> Self {
        let mut prefs = Self::default();
        for (key, value) in table {
            if let Err(message) = prefs.apply_toml(&key, value) {
                warn!(key, "ignoring config value, keeping default: {message}");
            }
        }
        prefs
    }

    fn apply_toml(&mut self, key: &str, value: toml::Value) -> Result<(), String> {
        fn decode<T: DeserializeOwned>(value: toml::Value) -> Result<T, String> {
            value.try_into().map_err(|e: toml::de::Error| e.to_string())
        }
        match key {
            "language" => self.language = decode(value)?,
            "theme" => self.theme = decode(value)?,
            "work_minutes" => self.work_minutes = decode(value)?,
            "sound" => self.sound = decode(value)?,
            "volume" => self.volume = decode(value)?,
            "auto_break" => self.auto_break = decode(value)?,
            "ui_sounds" => self.ui_sounds = decode(value)?,
            "ui_volume" => self.ui_volume = decode(value)?,
            "welcome_seen" => self.welcome_seen = decode(value)?,
            _ => return Err("unknown key".into()),
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a value as string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by key. The preferences are left untouched when the key
    /// is unknown or the value does not parse or is out of range.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownKey`] or [`ConfigError::InvalidValue`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Preferences =
            serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// All keys with their current values.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        PREFERENCE_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        if !(MIN_WORK_MINUTES..=MAX_WORK_MINUTES).contains(&self.work_minutes)
            || self.work_minutes % WORK_MINUTES_STEP != 0
        {
            return Err(invalid(
                "work_minutes",
                format!(
                    "must be between {MIN_WORK_MINUTES} and {MAX_WORK_MINUTES} in steps of {WORK_MINUTES_STEP}"
                ),
            ));
        }
        if self.volume > 100 {
            return Err(invalid("volume", "must be between 0 and 100".into()));
        }
        if self.ui_volume > 100 {
            return Err(invalid("ui_volume", "must be between 0 and 100".into()));
        }
        Ok(())
    }

    /// Pull out-of-range values from a hand-edited file back into range.
    fn sanitize(&mut self) {
        if self.validate().is_ok() {
            return;
        }
        warn!("config.toml holds out-of-range values, clamping them");
        let work = self.work_minutes.clamp(MIN_WORK_MINUTES, MAX_WORK_MINUTES);
        self.work_minutes = (work + WORK_MINUTES_STEP / 2) / WORK_MINUTES_STEP * WORK_MINUTES_STEP;
        self.work_minutes = self.work_minutes.min(MAX_WORK_MINUTES);
        self.volume = self.volume.min(100);
        self.ui_volume = self.ui_volume.min(100);
    }
}
