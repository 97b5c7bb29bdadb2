//! TOML-based Sabbath mode configuration.
//!
//! Holds the shield presentation settings read by the shield-rendering
//! collaborator: whether to show a shield, the shield message, and the
//! emergency-call allowances.
//!
//! Stored at `~/.config/sabbathlock/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{CoreError, Result};

/// Configuration for what happens during Sabbath mode.
///
/// Serialized to/from TOML at `~/.config/sabbathlock/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeConfig {
    /// Whether to show a shield over blocked apps.
    #[serde(default = "default_true")]
    pub show_shield: bool,
    /// Custom message to display on the shield.
    #[serde(default = "default_shield_message")]
    pub shield_message: String,
    /// Whether to allow emergency calls.
    #[serde(default = "default_true")]
    pub allow_emergency_calls: bool,
    /// Whether to allow specific contacts.
    #[serde(default)]
    pub allowed_contacts_enabled: bool,
}

fn default_true() -> bool {
    true
}

fn default_shield_message() -> String {
    "Shabbat Shalom! This app is locked during Sabbath.".into()
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            show_shield: true,
            shield_message: default_shield_message(),
            allow_emergency_calls: true,
            allowed_contacts_enabled: false,
        }
    }
}

impl ModeConfig {
    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: ModeConfig = toml::from_str(&content)
                    .map_err(|e| CoreError::Internal(format!("config parse failed: {e}")))?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CoreError::Internal(format!("config serialize failed: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get a config value as a string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let value = json.get(key)?;
        Some(match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Set a config value from a string by key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| CoreError::Internal("config is not a map".into()))?;
        let existing = obj.get(key).ok_or_else(|| CoreError::Validation {
            field: key.to_string(),
            message: "unknown config key".into(),
        })?;
        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>().map_err(
                |_| CoreError::Validation {
                    field: key.to_string(),
                    message: format!("cannot parse '{value}' as bool"),
                },
            )?),
            _ => serde_json::Value::String(value.into()),
        };
        obj.insert(key.to_string(), new_value);
        *self = serde_json::from_value(json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ModeConfig::default();
        assert!(cfg.show_shield);
        assert!(cfg.allow_emergency_calls);
        assert!(!cfg.allowed_contacts_enabled);
        assert!(cfg.shield_message.contains("Shabbat Shalom"));
    }

    #[test]
    fn toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = ModeConfig::default();
        cfg.shield_message = "Rest now.".into();
        cfg.allowed_contacts_enabled = true;
        cfg.save_to(&path).unwrap();

        let loaded = ModeConfig::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_missing_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = ModeConfig::load_from(&path).unwrap();
        assert_eq!(cfg, ModeConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn get_and_set_by_key() {
        let mut cfg = ModeConfig::default();
        assert_eq!(cfg.get("show_shield").as_deref(), Some("true"));
        assert!(cfg.get("missing").is_none());

        cfg.set("show_shield", "false").unwrap();
        assert!(!cfg.show_shield);
        cfg.set("shield_message", "A message").unwrap();
        assert_eq!(cfg.shield_message, "A message");

        assert!(cfg.set("missing", "x").is_err());
        assert!(cfg.set("show_shield", "not-a-bool").is_err());
    }
}
