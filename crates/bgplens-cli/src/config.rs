use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Optional user configuration. CLI flags always win over config values.
///
/// ```toml
/// default_interface = "textdump"
///
/// [interfaces.textdump]
/// path = "/data/bgp-archive"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub default_interface: Option<String>,

    /// Per-interface option defaults, applied before any `-o` flag
    #[serde(default)]
    pub interfaces: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match resolve_config_path(explicit) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }
}

/// Resolve the config file path based on priority:
/// 1. Explicit `--config` path
/// 2. BGPLENS_CONFIG environment variable
/// 3. XDG config directory (`<config>/bgplens/config.toml`)
fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }
    if let Ok(env_path) = std::env::var("BGPLENS_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|dir| dir.join("bgplens").join("config.toml"))
}
