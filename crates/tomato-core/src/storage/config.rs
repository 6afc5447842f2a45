//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Work and relax durations, in abstract units
//! - Wall time of one unit and the clock's pulses per unit
//! - Whether to stop or keep running at a phase boundary
//! - Phase labels and ring colors
//!
//! Configuration is stored at `~/.config/tomato/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::session::PhaseStyle;
use crate::timer::{Phase, TimerSettings};

/// Timer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_work_duration")]
    pub work_duration: u64,
    #[serde(default = "default_relax_duration")]
    pub relax_duration: u64,
    /// Wall time of one unit.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Clock pulses per unit; more pulses give a smoother ring.
    #[serde(default = "default_pulses_per_tick")]
    pub pulses_per_tick: u32,
    #[serde(default)]
    pub auto_cycle: bool,
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_work_label")]
    pub work_label: String,
    #[serde(default = "default_relax_label")]
    pub relax_label: String,
    #[serde(default = "default_work_color")]
    pub work_color: String,
    #[serde(default = "default_relax_color")]
    pub relax_color: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tomato/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

// Default functions
fn default_work_duration() -> u64 {
    10
}
fn default_relax_duration() -> u64 {
    5
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_pulses_per_tick() -> u32 {
    1
}
fn default_work_label() -> String {
    Phase::Work.label().into()
}
fn default_relax_label() -> String {
    Phase::Relax.label().into()
}
fn default_work_color() -> String {
    Phase::Work.color().into()
}
fn default_relax_color() -> String {
    Phase::Relax.color().into()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_duration: default_work_duration(),
            relax_duration: default_relax_duration(),
            tick_interval_ms: default_tick_interval_ms(),
            pulses_per_tick: default_pulses_per_tick(),
            auto_cycle: false,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            work_label: default_work_label(),
            relax_label: default_relax_label(),
            work_color: default_work_color(),
            relax_color: default_relax_color(),
        }
    }
}

impl Config {
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
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|_| ConfigError::invalid(key, format!("'{value}' is not a bool")))?,
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| {
                            ConfigError::invalid(key, format!("'{value}' is not a non-negative integer"))
                        })?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(ConfigError::invalid(key, "is a section, not a value"));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Location of the settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or create the default file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// See [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. The result is validated before it
    /// replaces the current settings; nothing is written to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting config is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.work_duration == 0 {
            return Err(ConfigError::invalid("timer.work_duration", "must be greater than 0"));
        }
        if self.timer.relax_duration == 0 {
            return Err(ConfigError::invalid("timer.relax_duration", "must be greater than 0"));
        }
        if self.timer.tick_interval_ms == 0 {
            return Err(ConfigError::invalid("timer.tick_interval_ms", "must be greater than 0"));
        }
        if self.timer.pulses_per_tick == 0 {
            return Err(ConfigError::invalid("timer.pulses_per_tick", "must be greater than 0"));
        }
        for (key, color) in [
            ("ui.work_color", &self.ui.work_color),
            ("ui.relax_color", &self.ui.relax_color),
        ] {
            if !is_hex_color(color) {
                return Err(ConfigError::invalid(key, format!("'{color}' is not a #RRGGBB color")));
            }
        }
        Ok(())
    }

    pub fn timer_settings(&self) -> TimerSettings {
        TimerSettings::new(self.timer.work_duration, self.timer.relax_duration)
            .with_auto_cycle(self.timer.auto_cycle)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.timer.tick_interval_ms)
    }

    pub fn phase_style(&self) -> PhaseStyle {
        PhaseStyle {
            work_label: self.ui.work_label.clone(),
            relax_label: self.ui.relax_label.clone(),
            work_color: self.ui.work_color.clone(),
            relax_color: self.ui.relax_color.clone(),
        }
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.timer.work_duration, 10);
        assert_eq!(cfg.timer.relax_duration, 5);
        assert_eq!(cfg.timer.tick_interval_ms, 1000);
        assert_eq!(cfg.timer.pulses_per_tick, 1);
        assert!(!cfg.timer.auto_cycle);
        assert_eq!(cfg.ui.work_color, "#4876F5");
        assert_eq!(cfg.ui.relax_label, "Relax");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[timer]\nwork_duration = 1500\n").unwrap();
        assert_eq!(cfg.timer.work_duration, 1500);
        assert_eq!(cfg.timer.relax_duration, 5);
        assert_eq!(cfg.ui, UiConfig::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.work_duration").as_deref(), Some("10"));
        assert_eq!(cfg.get("timer.auto_cycle").as_deref(), Some("false"));
        assert_eq!(cfg.get("ui.relax_color").as_deref(), Some("#44D14A"));
        assert!(cfg.get("timer").is_none());
        assert!(cfg.get("timer.missing_key").is_none());
    }

    #[test]
    fn set_updates_values() {
        let mut cfg = Config::default();
        cfg.set("timer.work_duration", "1500").unwrap();
        cfg.set("timer.auto_cycle", "true").unwrap();
        cfg.set("ui.work_label", "Focus").unwrap();
        assert_eq!(cfg.timer.work_duration, 1500);
        assert!(cfg.timer.auto_cycle);
        assert_eq!(cfg.ui.work_label, "Focus");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(cfg.set("timer.nonexistent_key", "1").is_err());
        assert!(cfg.set("", "1").is_err());
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("timer.auto_cycle", "not_a_bool").is_err());
        assert!(cfg.set("timer.work_duration", "-3").is_err());
        assert!(cfg.set("timer", "1").is_err());
    }

    #[test]
    fn set_rejects_invalid_value_and_keeps_old() {
        let mut cfg = Config::default();
        assert!(cfg.set("timer.relax_duration", "0").is_err());
        assert!(cfg.set("ui.work_color", "blue").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn timer_settings_follow_config() {
        let mut cfg = Config::default();
        cfg.timer.auto_cycle = true;
        let settings = cfg.timer_settings();
        assert_eq!(settings.work_duration, 10);
        assert!(settings.auto_cycle);
        assert_eq!(cfg.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("timer.work_duration", "1500").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().timer.work_duration, 1500);
    }

    #[test]
    fn load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nwork_duration = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
        std::fs::write(&path, "not toml at all [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
