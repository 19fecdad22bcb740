//! Tool configuration, stored as TOML under the user's config directory

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

/// What to do when an output file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClobberAction {
    /// Nothing here can prompt, so this behaves like `Never`
    Ask,
    Always,
    #[default]
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressType {
    #[default]
    None,
    Percent,
    Dot,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub clobber: ClobberAction,
    pub debug: bool,
    pub output_dir: Option<PathBuf>,
    pub progress: ProgressType,
}

impl ToolConfig {
    pub fn may_overwrite(&self) -> bool {
        self.clobber == ClobberAction::Always
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shnwave")
        .join("config.toml")
}

/// Load from [`config_path`], falling back to defaults
pub fn load_config() -> ToolConfig {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> ToolConfig {
    let Ok(text) = std::fs::read_to_string(path) else {
        return ToolConfig::default();
    };
    match toml::from_str(&text) {
        Ok(config) => config,
        Err(e) => {
            debug!("ignoring malformed config '{}': {}", path.display(), e);
            ToolConfig::default()
        }
    }
}
