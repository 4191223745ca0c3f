//! `config.toml` loading and client settings resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cinescope_api::ApiConfig;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Movie service client settings.
    #[serde(default)]
    pub api: ApiConfig,
}

impl AppConfig {
    /// Config file location.
    ///
    /// `{dir}/config.toml` when `dir` is given, otherwise
    /// `~/.config/cinescope/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is `None` and `HOME` is not set.
    pub fn path(dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(d) = dir {
            return Ok(d.join("config.toml"));
        }

        let home = std::env::var("HOME").context("HOME environment variable is not set")?;
        Ok(PathBuf::from(home).join(".config/cinescope/config.toml"))
    }

    /// Loads config from a TOML file. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Picks the base URL override: `--api-url` first, then `api.base_url`.
    ///
    /// Blank values count as unset. `None` leaves the choice to the
    /// build-time value or the local default.
    #[must_use]
    pub fn base_url_override<'a>(&'a self, flag: Option<&'a str>) -> Option<&'a str> {
        flag.map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.api
                    .base_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            })
    }
}
