//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/multitree/multitree.toml`
//! 3. Local config: `<dir>/.multitree.toml` (only when a directory is given)
//! 4. Environment variables: `MULTITREE_*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::builder::DEFAULT_INDENT_WIDTH;
use crate::domain::render::{GlyphSet, RenderOptions};

#[derive(Error, Debug)]
#[error("config error: {message}")]
pub struct SettingsError {
    pub message: String,
}

fn config_err(e: impl std::fmt::Display) -> SettingsError {
    SettingsError {
        message: e.to_string(),
    }
}

/// How trees are drawn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    /// Escape tabs, newlines and carriage returns in labels
    pub escape: bool,
    /// Box-drawing or ASCII connectors
    pub glyphs: GlyphSet,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            escape: true,
            glyphs: GlyphSet::Unicode,
        }
    }
}

/// How outline input is read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutlineSettings {
    /// Spaces per indentation level
    pub indent_width: usize,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

/// Unified configuration for multitree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub render: RenderSettings,
    pub outline: OutlineSettings,
}

/// Raw settings for intermediate parsing.
///
/// Every field is optional so a layer only overrides what it names.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub render: RawRenderSettings,
    pub outline: RawOutlineSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderSettings {
    pub escape: Option<bool>,
    pub glyphs: Option<GlyphSet>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutlineSettings {
    pub indent_width: Option<usize>,
}

/// Get the XDG config directory for multitree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "multitree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("multitree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".multitree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|e| SettingsError {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| SettingsError {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// An unset variable is `None`, a value of the wrong type is an error.
fn env_value<V>(key: &str, lookup: Result<V, ConfigError>) -> Result<Option<V>, SettingsError> {
    match lookup {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(SettingsError {
            message: format!("environment override {}: {}", key, e),
        }),
    }
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            render: RenderSettings {
                escape: overlay.render.escape.unwrap_or(self.render.escape),
                glyphs: overlay.render.glyphs.unwrap_or(self.render.glyphs),
            },
            outline: OutlineSettings {
                indent_width: overlay
                    .outline
                    .indent_width
                    .unwrap_or(self.outline.indent_width),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.multitree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("local config: {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply MULTITREE_* environment variables as explicit overrides.
    #[instrument(level = "trace", skip(settings))]
    fn apply_env_overrides(mut settings: Self) -> Result<Self, SettingsError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("MULTITREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value("render.escape", config.get_bool("render.escape"))? {
            settings.render.escape = val;
        }
        if let Some(val) = env_value("render.glyphs", config.get_string("render.glyphs"))? {
            settings.render.glyphs = val.parse().map_err(config_err)?;
        }
        if let Some(val) = env_value(
            "outline.indent_width",
            config.get_int("outline.indent_width"),
        )? {
            settings.outline.indent_width = usize::try_from(val).map_err(config_err)?;
        }

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.outline.indent_width == 0 {
            return Err(SettingsError {
                message: "outline.indent_width must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::default()
            .with_escape(self.render.escape)
            .with_glyphs(self.render.glyphs)
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(config_err)
    }
}
