//! Board configuration loaded with Figment
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. `workshop.toml` / `workshop.yaml` in the base directory
//! 3. `WORKSHOP_`-prefixed environment variables (`WORKSHOP_DATA_DIR`, ...)

use crate::error::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "WORKSHOP_";

/// Settings for one board session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Directory of the file-backed board
    pub data_dir: PathBuf,
    /// Collapse queued order declarations for the same container
    pub coalesce: bool,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".workshop"),
            coalesce: true,
            log_level: "info".to_string(),
        }
    }
}

impl BoardConfig {
    /// Load from the current directory
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Load with config files looked up in `base`
    pub fn load_from(base: &Path) -> Result<Self> {
        let config: Self = Self::figment(base).extract()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    fn figment(base: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(base.join("workshop.toml")))
            .merge(Yaml::file(base.join("workshop.yaml")))
            .merge(Env::prefixed(ENV_PREFIX))
    }
}
