//! TOML-based application configuration.
//!
//! Stores:
//! - The active profile id
//! - Decay thresholds
//! - XP rewards for tracked activities
//!
//! Configuration is stored at `~/.config/studybuddy/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use super::profile::ProfileId;
use crate::error::{ConfigError, Result};
use crate::rank::DecayPolicy;

const CONFIG_FILE: &str = "config.toml";

/// XP granted for tracked activities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardsConfig {
    #[serde(default = "default_session_xp")]
    pub session_xp: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/studybuddy/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Profile used when none is given on the command line.
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default)]
    pub decay: DecayPolicy,
    #[serde(default)]
    pub rewards: RewardsConfig,
}

fn default_profile() -> String {
    "default".into()
}
fn default_session_xp() -> u32 {
    100
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            session_xp: default_session_xp(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            decay: DecayPolicy::default(),
            rewards: RewardsConfig::default(),
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

    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<()> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if part.is_empty() {
                return Err(unknown().into());
            }
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value
                        .parse::<u32>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                        .into(),
                ),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot set a whole section".into()).into());
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown().into())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join(CONFIG_FILE))
    }

    /// Load from the data directory, or return defaults.
    pub fn load() -> Self {
        match Self::path() {
            Ok(path) => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to default config");
                Self::default()
            }),
            Err(e) => {
                tracing::warn!(error = %e, "no data directory, using default config");
                Self::default()
            }
        }
    }

    /// Load from `path`; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = ProfileId::new(&self.profile) {
            return Err(ConfigError::InvalidValue {
                key: "profile".into(),
                message: e.to_string(),
            }
            .into());
        }
        if self.decay.decay_after_hours <= self.decay.warning_after_hours {
            return Err(ConfigError::InvalidValue {
                key: "decay.decay_after_hours".into(),
                message: format!(
                    "must be greater than decay.warning_after_hours ({})",
                    self.decay.warning_after_hours
                ),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.profile, "default");
        assert_eq!(config.decay.warning_after_hours, 48);
        assert_eq!(config.decay.decay_after_hours, 72);
        assert_eq!(config.decay.demotion_cooldown_hours, 24);
        assert_eq!(config.rewards.session_xp, 100);
    }

    #[test]
    fn test_get_by_path() {
        let config = Config::default();
        assert_eq!(config.get("profile").as_deref(), Some("default"));
        assert_eq!(config.get("decay.decay_after_hours").as_deref(), Some("72"));
        assert_eq!(config.get("decay.nope"), None);
        assert_eq!(config.get(""), None);
    }

    #[test]
    fn test_set_by_path() {
        let mut config = Config::default();
        config.set("rewards.session_xp", "250").unwrap();
        config.set("profile", "alice").unwrap();
        assert_eq!(config.rewards.session_xp, 250);
        assert_eq!(config.profile, "alice");
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let mut config = Config::default();
        let err = config.set("decay.bogus", "1").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn test_set_rejects_inverted_decay_window() {
        let mut config = Config::default();
        let err = config.set("decay.decay_after_hours", "12").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Config(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(config.decay.decay_after_hours, 72);
    }

    #[test]
    fn test_set_rejects_unusable_profile_id() {
        let mut config = Config::default();
        for bad in ["../x", "a:b", "", "with space"] {
            let err = config.set("profile", bad).unwrap_err();
            assert!(matches!(
                err,
                CoreError::Config(ConfigError::InvalidValue { .. })
            ));
        }
        assert_eq!(config.profile, "default");
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "profile = \"../x\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_set_rejects_bad_number() {
        let mut config = Config::default();
        assert!(config.set("rewards.session_xp", "lots").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);

        let mut config = Config::default();
        config.set("decay.warning_after_hours", "24").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.decay.warning_after_hours, 24);
        assert_eq!(loaded.decay.decay_after_hours, 72);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.profile, "default");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[decay]\nwarning_after_hours = 36\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.decay.warning_after_hours, 36);
        assert_eq!(loaded.decay.decay_after_hours, 72);
        assert_eq!(loaded.rewards.session_xp, 100);
    }
}
