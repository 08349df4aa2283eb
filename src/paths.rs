//! Application path management.
//!
//! All files live under one base directory:
//!
//! - `config.yaml`: optional settings (see [`crate::config`])
//! - `macros.json`: the macro store
//! - `logs/`: rolling log files, when file logging is enabled
//!
//! The base directory is `<config-root>/redstonetools`, where the config root
//! is `%APPDATA%` on Windows, `~/.config` on Linux and
//! `~/Library/Application Support` on macOS.

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name under the platform config root
pub const APP_NAMESPACE: &str = "redstonetools";

/// Application paths for config, macros and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Base directory holding everything below
    pub base_dir: PathBuf,
    /// Path to the configuration file
    pub config: PathBuf,
    /// Path to the macro store
    pub macros: PathBuf,
    /// Path to the logs directory
    pub logs_dir: PathBuf,
}

impl AppPaths {
    /// Resolve paths from the platform config directory.
    ///
    /// Falls back to the executable's directory when the platform reports
    /// no config directory.
    ///
    /// Note: This is called before logging is initialized, so we use eprintln
    /// for early diagnostic output.
    pub fn detect() -> Self {
        let config_root = dirs::config_dir().unwrap_or_else(|| {
            eprintln!("[paths] WARNING: dirs::config_dir() returned None, falling back to exe dir");
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."))
        });

        #[cfg(debug_assertions)]
        eprintln!("[paths] Config root: {}", config_root.display());

        Self::under(config_root)
    }

    /// Same layout under an explicit config root
    pub fn under(config_root: impl AsRef<Path>) -> Self {
        let base_dir = config_root.as_ref().join(APP_NAMESPACE);
        Self {
            config: base_dir.join("config.yaml"),
            macros: base_dir.join("macros.json"),
            logs_dir: base_dir.join("logs"),
            base_dir,
        }
    }

    /// Ensure the base and log directories exist.
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        for dir in [&self.base_dir, &self.logs_dir] {
            if !dir.exists() {
                debug!("Creating directory: {}", dir.display());
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
        }
        Ok(())
    }
}
