use crate::models::License;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Defaults applied to fields the user leaves out, read from an optional TOML file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default = "default_name_sep")]
    pub name_sep: String,
    #[serde(default)]
    pub license: License,
    /// Preferred encoding of description files.
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub pack_name: Option<String>,
    #[serde(default)]
    pub sort_files: bool,
    /// When set, logs are also written to a daily-rotated file in this folder.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_pattern() -> String { "*".into() }
fn default_name_sep() -> String { "_".into() }

impl Default for Config {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            name_sep: default_name_sep(),
            license: License::default(),
            encoding: None,
            pack_name: None,
            sort_files: false,
            log_dir: None,
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&s)?;
        Ok(cfg)
    }

    /// `<config dir>/bulker/config.toml`, e.g. `~/.config/bulker/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("bulker").join("config.toml"))
    }

    /// Explicit path if given (must parse), else the default location if present,
    /// else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(p) = explicit {
            return Self::from_path(p);
        }
        match Self::default_path() {
            Some(p) if p.exists() => Self::from_path(&p),
            _ => Ok(Self::default()),
        }
    }
}
