//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treestore/treestore.toml`
//! 3. Local config: explicit path passed to [`Settings::load`]
//! 4. Environment variables: `TREESTORE_*` prefix

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{TreeStoreError, TreeStoreResult};

/// What to do when two records share an id.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateIdPolicy {
    /// The later record replaces the earlier one but keeps its position.
    #[default]
    LastWriteWins,
    /// Fail construction with `DuplicateId`.
    Reject,
}

/// What to do when more than one record is marked as root.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RootPolicy {
    /// The last root-marked record in index order takes the root slot.
    #[default]
    LastWins,
    /// Fail construction with `MultipleRoots`.
    Reject,
}

impl FromStr for DuplicateIdPolicy {
    type Err = TreeStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last-write-wins" => Ok(Self::LastWriteWins),
            "reject" => Ok(Self::Reject),
            other => Err(TreeStoreError::Config {
                message: format!("unknown duplicate id policy: {}", other),
            }),
        }
    }
}

impl FromStr for RootPolicy {
    type Err = TreeStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last-wins" => Ok(Self::LastWins),
            "reject" => Ok(Self::Reject),
            other => Err(TreeStoreError::Config {
                message: format!("unknown root policy: {}", other),
            }),
        }
    }
}

impl fmt::Display for DuplicateIdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastWriteWins => write!(f, "last-write-wins"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

impl fmt::Display for RootPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastWins => write!(f, "last-wins"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Tree rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Label rendered for a store without a root
    pub empty_label: String,
    /// Levels kept by `TreeRender::to_tree_string`, root included
    pub max_depth: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            empty_label: "Empty tree".into(),
            max_depth: 512,
        }
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub duplicate_ids: Option<DuplicateIdPolicy>,
    pub multiple_roots: Option<RootPolicy>,
    pub display: RawDisplayConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDisplayConfig {
    pub empty_label: Option<String>,
    pub max_depth: Option<usize>,
}

/// Unified configuration for treestore.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub duplicate_ids: DuplicateIdPolicy,
    pub multiple_roots: RootPolicy,
    pub display: DisplayConfig,
}

/// Get the XDG config directory for treestore.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treestore").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treestore.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> TreeStoreResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| TreeStoreError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| TreeStoreError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: config::ConfigError) -> TreeStoreError {
    TreeStoreError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Settings that fail construction on ambiguous input.
    pub fn strict() -> Self {
        Self {
            duplicate_ids: DuplicateIdPolicy::Reject,
            multiple_roots: RootPolicy::Reject,
            ..Self::default()
        }
    }

    /// Overlay wins where it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            duplicate_ids: overlay.duplicate_ids.unwrap_or(self.duplicate_ids),
            multiple_roots: overlay.multiple_roots.unwrap_or(self.multiple_roots),
            display: DisplayConfig {
                empty_label: overlay
                    .display
                    .empty_label
                    .clone()
                    .unwrap_or_else(|| self.display.empty_label.clone()),
                max_depth: overlay.display.max_depth.unwrap_or(self.display.max_depth),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// `local` names an optional TOML file layered above the global config.
    /// A missing global file is skipped; a missing local file is an error.
    pub fn load(local: Option<&Path>) -> TreeStoreResult<Self> {
        Self::load_layers(global_config_path().as_deref(), local)
    }

    /// Same layering as [`Settings::load`] with an explicit global file
    /// instead of the XDG location. A missing global file is skipped.
    pub fn load_layers(global: Option<&Path>, local: Option<&Path>) -> TreeStoreResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(local_path) = local {
            debug!(path = %local_path.display(), "loading local config");
            current = current.merge_with(&load_raw_settings(local_path)?);
        }

        Self::apply_env_overrides(current)
    }

    /// Apply TREESTORE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> TreeStoreResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREESTORE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("duplicate_ids") {
            settings.duplicate_ids = val.parse()?;
        }
        if let Ok(val) = config.get_string("multiple_roots") {
            settings.multiple_roots = val.parse()?;
        }
        if let Ok(val) = config.get_string("display.empty_label") {
            settings.display.empty_label = val;
        }
        if let Ok(val) = config.get_string("display.max_depth") {
            settings.display.max_depth = val.parse().map_err(|e| TreeStoreError::Config {
                message: format!("display.max_depth: {}", e),
            })?;
        }

        Ok(settings)
    }
}
