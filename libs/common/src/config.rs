//! Layered configuration
//!
//! Sources, lowest priority first:
//!
//! 1. built-in defaults
//! 2. YAML file: `--config` path, else `LABKIT_CONFIG`, else `labkit.yaml`
//! 3. environment variables with the `LABKIT_` prefix, nested keys split on
//!    `__` (`LABKIT_TITRATION__STEP_ML=0.25`)

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "labkit.yaml";

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "LABKIT_CONFIG";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "LABKIT_";

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Emit JSON lines instead of bracketed text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitrationConfig {
    /// Base volume increment between curve samples, mL
    pub step_ml: f64,
}

impl Default for TitrationConfig {
    fn default() -> Self {
        Self { step_ml: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Trajectory sample count
    pub samples: usize,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self { samples: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Frame period, ms
    pub tick_ms: u64,
    /// Simulation seconds per wall-clock second
    pub time_scale: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            time_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file holding favorites and lesson progress
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".labkit/state.json"),
        }
    }
}

/// Complete lab tool configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub logging: LoggingConfig,
    pub titration: TitrationConfig,
    pub projectile: ProjectileConfig,
    pub playback: PlaybackConfig,
    pub store: StoreConfig,
}

impl LabConfig {
    /// Load from all sources and validate
    ///
    /// An explicit `path` must exist; the fallback file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: LabConfig = Self::figment(path)?.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Provider stack without extraction
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(LabConfig::default()));

        let (config_path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match std::env::var(CONFIG_PATH_ENV) {
                Ok(p) => (PathBuf::from(p), true),
                Err(_) => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
            },
        };

        if config_path.exists() {
            debug!(path = %config_path.display(), "config file");
            figment = figment.merge(Yaml::file(&config_path));
        } else if explicit {
            return Err(Error::config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        } else {
            debug!(path = %config_path.display(), "no config file, using defaults");
        }

        Ok(figment.merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["log", "config"])
                .split("__"),
        ))
    }

    pub fn validate(&self) -> Result<()> {
        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::config(format!(
                "Invalid log level '{}', expected one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        if !self.titration.step_ml.is_finite() || self.titration.step_ml <= 0.0 {
            return Err(Error::config("titration.step_ml must be positive"));
        }

        if self.projectile.samples < 2 {
            return Err(Error::config("projectile.samples must be at least 2"));
        }

        if self.playback.tick_ms == 0 {
            return Err(Error::config("playback.tick_ms must be greater than 0"));
        }

        if !self.playback.time_scale.is_finite() || self.playback.time_scale <= 0.0 {
            return Err(Error::config("playback.time_scale must be positive"));
        }

        if self.store.path.as_os_str().is_empty() {
            return Err(Error::config("store.path cannot be empty"));
        }

        Ok(())
    }

    /// Effective configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let config = LabConfig::load(None).unwrap();
            assert_eq!(config, LabConfig::default());
            assert_eq!(config.titration.step_ml, 0.5);
            assert_eq!(config.projectile.samples, 50);
            assert_eq!(config.playback.tick_ms, 16);
            assert_eq!(config.store.path, PathBuf::from(".labkit/state.json"));
            Ok(())
        });
    }

    #[test]
    fn test_yaml_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                "titration:\n  step_ml: 0.25\nlogging:\n  level: debug\n",
            )?;
            let config = LabConfig::load(None).unwrap();
            assert_eq!(config.titration.step_ml, 0.25);
            assert_eq!(config.logging.level, "debug");
            assert_eq!(config.projectile.samples, 50);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.yaml", "projectile:\n  samples: 20\n")?;
            jail.set_env("LABKIT_PROJECTILE__SAMPLES", "80");
            jail.set_env("LABKIT_PLAYBACK__TIME_SCALE", "0.5");
            jail.set_env("LABKIT_LOG", "trace");

            let config = LabConfig::load(Some(Path::new("custom.yaml"))).unwrap();
            assert_eq!(config.projectile.samples, 80);
            assert_eq!(config.playback.time_scale, 0.5);
            assert_eq!(config.logging.level, "info");
            Ok(())
        });
    }

    #[test]
    fn test_config_path_from_env() {
        Jail::expect_with(|jail| {
            jail.create_file("elsewhere.yaml", "playback:\n  tick_ms: 40\n")?;
            jail.set_env(CONFIG_PATH_ENV, "elsewhere.yaml");
            let config = LabConfig::load(None).unwrap();
            assert_eq!(config.playback.tick_ms, 40);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        Jail::expect_with(|_jail| {
            let err = LabConfig::load(Some(Path::new("nope.yaml"))).unwrap_err();
            assert!(matches!(err, Error::Config(_)));
            Ok(())
        });
    }

    #[test]
    fn test_validation() {
        let mut config = LabConfig::default();
        assert!(config.validate().is_ok());

        config.titration.step_ml = 0.0;
        assert!(config.validate().is_err());

        let mut config = LabConfig::default();
        config.projectile.samples = 0;
        assert!(config.validate().is_err());

        let mut config = LabConfig::default();
        config.playback.tick_ms = 0;
        assert!(config.validate().is_err());

        let mut config = LabConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = LabConfig::default();
        config.logging.level = "WARN".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_file_rejected_on_load() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_FILE, "playback:\n  tick_ms: 0\n")?;
            assert!(LabConfig::load(None).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_to_yaml() {
        let yaml = LabConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("step_ml: 0.5"));
        assert!(yaml.contains("tick_ms: 16"));
    }
}
