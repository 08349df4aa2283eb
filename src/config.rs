//! Configuration management for Redstone Tools
//!
//! Handles loading and parsing of the optional YAML configuration file.
//! Every field has a default, so a missing file is equivalent to an empty one.

use crate::macros::StoreOptions;
use crate::paths::AppPaths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub macros: MacroConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Macro store configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MacroConfig {
    /// Overrides the default `macros.json` location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Copy a corrupt macro file aside before it is replaced by defaults
    #[serde(default = "default_true")]
    pub backup_corrupt: bool,
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            path: None,
            backup_corrupt: default_true(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter (error, warn, info, debug, trace) when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write daily log files to the logs directory
    #[serde(default)]
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file; a missing file yields defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))
            }
        };

        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse configuration from YAML text
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: AppConfig =
            serde_yaml::from_str(content).context("Failed to parse YAML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.macros.path {
            if path.as_os_str().is_empty() {
                anyhow::bail!("macros.path cannot be empty");
            }
        }

        if self.logging.level.trim().is_empty() {
            anyhow::bail!("logging.level cannot be empty");
        }

        Ok(())
    }

    /// Macro file to open: the configured override or the default location
    pub fn macros_path(&self, paths: &AppPaths) -> PathBuf {
        self.macros
            .path
            .clone()
            .unwrap_or_else(|| paths.macros.clone())
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            backup_corrupt: self.macros.backup_corrupt,
        }
    }
}

// Default value functions
fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.macros.backup_corrupt);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.file);
    }

    #[test]
    fn test_parse_full_config() {
        let config = AppConfig::parse(
            r#"
macros:
  path: /srv/minecraft/macros.json
  backup_corrupt: false
logging:
  level: debug
  file: true
"#,
        )
        .unwrap();

        let paths = AppPaths::under("/home/alex/.config");
        assert_eq!(
            config.macros_path(&paths),
            PathBuf::from("/srv/minecraft/macros.json")
        );
        assert!(!config.store_options().backup_corrupt);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.file);
    }

    #[test]
    fn test_partial_config() {
        let config = AppConfig::parse("logging:\n  level: warn\n").unwrap();
        let paths = AppPaths::under("/home/alex/.config");

        assert_eq!(config.macros_path(&paths), paths.macros);
        assert!(config.store_options().backup_corrupt);
    }

    #[test]
    fn test_invalid_config() {
        assert!(AppConfig::parse("macros: [1, 2]").is_err());
        assert!(AppConfig::parse("logging:\n  level: ''\n").is_err());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig::load(dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "macros:\n  backup_corrupt: false\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert!(!config.macros.backup_corrupt);
    }
}
