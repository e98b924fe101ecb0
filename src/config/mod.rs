//! Configuration file management
//!
//! Loads TOML configuration files and provides engine settings.
//! Default config path: ~/.config/vtgrid/config.toml

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{DEFAULT_COLS, DEFAULT_MAX_HISTORY, DEFAULT_ROWS};

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Terminal settings
    pub terminal: TerminalConfig,
}

/// Terminal settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Scrollback history cap in rows
    pub scrollback: usize,
    /// Initial grid width
    pub cols: usize,
    /// Initial grid height
    pub rows: usize,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            scrollback: DEFAULT_MAX_HISTORY,
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
        }
    }
}

impl Config {
    /// Get the path that would be used for loading config
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. VTGRID_CONFIG environment variable
        if let Ok(path) = std::env::var("VTGRID_CONFIG") {
            let p = std::path::Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        // 2. User config: ~/.config/vtgrid/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("vtgrid").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }
        }

        None
    }

    /// Load configuration with priority:
    /// 1. VTGRID_CONFIG environment variable
    /// 2. ~/.config/vtgrid/config.toml (user config)
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(path.to_string_lossy().as_ref()) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        Ok(config)
    }
}
