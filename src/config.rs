//==================================================
// File: config.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Host-side configuration of the embedding boundary
// Objective: Load stdlib, calendar and capability settings from TOML
//==================================================

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::builtins::date::Calendar;
use crate::capabilities::{Capabilities, FormatCapability, RandomCapability};
use crate::resources::{DirectoryProvider, ResourceRoot, SOURCE_EXTENSION};
use crate::stdlib::DEFAULT_MODULES;

/// Overrides `stdlib.root` when set.
pub const ROOT_ENV: &str = "CUB_STDLIB_ROOT";

const CONFIG_DIR: &str = "cub";
const CONFIG_FILE: &str = "stdlib.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading configuration from {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("parsing configuration {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EmbedConfig {
    pub stdlib: StdlibSection,
    pub calendar: CalendarSection,
    pub capabilities: CapabilitySection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StdlibSection {
    /// Load order of stdlib modules.
    pub modules: Vec<String>,
    /// Resource directory; the crate's own `stdlib/` when unset.
    pub root: Option<PathBuf>,
    pub extension: String,
}

impl Default for StdlibSection {
    fn default() -> Self {
        Self {
            modules: DEFAULT_MODULES.iter().map(|m| m.to_string()).collect(),
            root: None,
            extension: SOURCE_EXTENSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CalendarSection {
    pub time_zone: TimeZoneSetting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneSetting {
    Utc,
    #[default]
    Local,
    /// Seconds east of UTC.
    Fixed(i32),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CapabilitySection {
    pub random: bool,
    pub format: bool,
    pub random_seed: Option<u64>,
}

impl Default for CapabilitySection {
    fn default() -> Self {
        Self {
            random: true,
            format: true,
            random_seed: None,
        }
    }
}

impl EmbedConfig {
    pub fn from_toml_str(data: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(data)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `<config dir>/cub/stdlib.toml` for the current user.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Loads the user configuration if one exists, defaults otherwise.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn resource_root(&self) -> ResourceRoot {
        if let Ok(root) = env::var(ROOT_ENV) {
            if !root.trim().is_empty() {
                return ResourceRoot::Bundled(PathBuf::from(root));
            }
        }
        match &self.stdlib.root {
            Some(root) => ResourceRoot::Bundled(root.clone()),
            None => ResourceRoot::SourceTree,
        }
    }

    pub fn provider(&self) -> DirectoryProvider {
        DirectoryProvider::new(self.resource_root()).with_extension(self.stdlib.extension.clone())
    }

    pub fn calendar(&self) -> Calendar {
        match self.calendar.time_zone {
            TimeZoneSetting::Utc => Calendar::Utc,
            TimeZoneSetting::Local => Calendar::Local,
            TimeZoneSetting::Fixed(seconds) => Calendar::fixed(seconds).unwrap_or_else(|| {
                warn!(
                    offset_seconds = seconds,
                    "fixed time zone offset out of range (must be within ±86399 s); using UTC"
                );
                Calendar::Utc
            }),
        }
    }

    /// Build capabilities narrowed by this configuration.
    pub fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::native();
        if !self.capabilities.random {
            caps.random = RandomCapability::Unavailable;
        }
        if !self.capabilities.format {
            caps.format = FormatCapability::Unavailable;
        }
        match self.capabilities.random_seed {
            Some(seed) => caps.with_random_seed(seed),
            None => caps,
        }
    }
}
