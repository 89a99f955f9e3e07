//! Configuration for promptmerge
//!
//! Controls where templates are found and how their file names are built.
//! The only source is an optional `.promptmerge.yml` in the working
//! directory; without one the defaults reproduce `./base.yml` + `./<name>.yml`.

use eyre::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = ".promptmerge.yml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the base and child templates, relative to the working directory
    #[serde(rename = "template-dir")]
    pub template_dir: PathBuf,

    /// Name of the base document, without extension
    #[serde(rename = "base-name")]
    pub base_name: String,

    /// File extension shared by all templates
    pub extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("."),
            base_name: crate::DEFAULT_BASE_NAME.to_string(),
            extension: crate::DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl Config {
    /// Load `.promptmerge.yml` from `dir`, or use defaults when it is absent
    ///
    /// A config file that exists but cannot be read or parsed is an error.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(LOCAL_CONFIG_FILE);
        if !path.exists() {
            debug!("Config::load: no {} in {}, using defaults", LOCAL_CONFIG_FILE, dir.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).context(format!("Failed to read config file {}", path.display()))?;
        let config: Self =
            serde_yaml::from_str(&content).context(format!("Failed to parse config file {}", path.display()))?;

        info!("Loaded config from: {}", path.display());
        Ok(config)
    }
}
