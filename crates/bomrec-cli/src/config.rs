//! Persisted operator settings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bomrec::DEFAULT_TARGET_PATH;
use serde::{Deserialize, Serialize};

/// Settings remembered between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Folder the drawings are copied from
    #[serde(default)]
    pub source_path: String,

    /// Root of the PDF/DWG/STEP destination folders
    #[serde(default = "default_target_path")]
    pub target_path: String,

    /// Copy the DB description into the BOM
    #[serde(default)]
    pub with_description: bool,

    /// Export only the first 12 columns, with a styled header
    #[serde(default)]
    pub export_only_12_cols: bool,
}

fn default_target_path() -> String {
    DEFAULT_TARGET_PATH.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_path: String::new(),
            target_path: default_target_path(),
            with_description: false,
            export_only_12_cols: false,
        }
    }
}

impl Config {
    /// `<config dir>/bomrec/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bomrec").join("config.toml"))
    }

    /// Load from a TOML file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid configuration '{}'", path.display()))
    }

    /// Save to a TOML file, creating its directory
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create '{}'", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write '{}'", path.display()))
    }
}
