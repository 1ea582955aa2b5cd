//! Global configuration.
//!
//! An optional TOML file sets user-wide defaults:
//!
//! ```toml
//! # Fail on references to undefined variables instead of rendering them empty
//! strict = false
//!
//! # Variable sources loaded before ZENFIG_VARS_PATH and -I/--include
//! include = ["~/.config/zenfig/vars", "~/dotfiles/colors.yaml"]
//! ```
//!
//! **Location:** `$ZENFIG_CONFIG` when set, otherwise `zenfig/config.toml` under
//! the platform configuration directory (`~/.config` on Linux). A missing file
//! means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::ZenfigError;
use crate::resolver::{MissingReferencePolicy, ResolverOptions};

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "ZENFIG_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Use [`MissingReferencePolicy::Strict`].
    pub strict: bool,

    /// Variable sources loaded first. When absent, the default variables
    /// directory is used if it exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
}

impl GlobalConfig {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the default configuration; an explicit path that
    /// does not exist is an error.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self, ZenfigError> {
        match path {
            Some(path) => Self::load_from(&path).await,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path).await,
                _ => Ok(Self::default()),
            },
        }
    }

    pub async fn load_from(path: &Path) -> Result<Self, ZenfigError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ZenfigError::ConfigError {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ZenfigError::ConfigError {
            path: path.display().to_string(),
            reason: e.to_string().trim().to_string(),
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// `$ZENFIG_CONFIG`, or `<config_dir>/zenfig/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("zenfig").join("config.toml"))
    }

    /// `<config_dir>/zenfig/vars`.
    pub fn default_vars_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zenfig").join("vars"))
    }

    /// Sources this configuration contributes, lowest precedence first.
    pub fn include_sources(&self) -> Vec<PathBuf> {
        match &self.include {
            Some(include) => include.iter().map(PathBuf::from).collect(),
            None => Self::default_vars_dir().filter(|dir| dir.is_dir()).into_iter().collect(),
        }
    }

    /// Resolver options implied by this configuration and a `--strict` flag.
    pub fn resolver_options(&self, strict_flag: bool) -> ResolverOptions {
        ResolverOptions {
            missing_references: if self.strict || strict_flag {
                MissingReferencePolicy::Strict
            } else {
                MissingReferencePolicy::Stub
            },
        }
    }
}
