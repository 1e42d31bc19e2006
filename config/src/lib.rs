//! Configuration loading for navstack.
//!
//! ```toml
//! [navigation]
//! first = "home.tmpl"
//! container = "nav-content"
//!
//! [throttle]
//! push_cooldown_ms = 300
//! pop_cooldown_ms = 300
//!
//! [animation]
//! push_in = "slide-in-left"
//!
//! [nav_bar]
//! default_visible = true
//!
//! [[pages]]
//! source = "home.tmpl"
//! title = "Home"
//! ```
//!
//! Every section is optional; missing keys take the defaults shown above.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

pub use navstack_types::AnimationClasses;

/// Environment variable that overrides the default config location.
pub const CONFIG_ENV_VAR: &str = "NAVSTACK_CONFIG";

/// Cool-down applied to push and pop requests when none is configured.
pub const DEFAULT_COOLDOWN_MS: u64 = 300;

// Default value functions for serde (bool::default() is false, so only true needs a fn)
const fn default_true() -> bool {
    true
}

const fn default_cooldown_ms() -> u64 {
    DEFAULT_COOLDOWN_MS
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub navigation: NavigationConfig,
    pub throttle: ThrottleConfig,
    pub animation: AnimationClasses,
    pub nav_bar: NavBarConfig,
    /// Page catalog served by the in-memory resolver.
    pub pages: Vec<PageEntry>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavigationConfig {
    /// Source pushed when the controller starts.
    pub first: Option<String>,
    /// Container that pages are mounted into.
    pub container: Option<String>,
}

/// Cool-down windows for the leading-edge throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ThrottleConfig {
    #[serde(default = "default_cooldown_ms")]
    pub push_cooldown_ms: u64,
    #[serde(default = "default_cooldown_ms")]
    pub pop_cooldown_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            push_cooldown_ms: DEFAULT_COOLDOWN_MS,
            pop_cooldown_ms: DEFAULT_COOLDOWN_MS,
        }
    }
}

impl ThrottleConfig {
    #[must_use]
    pub fn push_cooldown(&self) -> Duration {
        Duration::from_millis(self.push_cooldown_ms)
    }

    #[must_use]
    pub fn pop_cooldown(&self) -> Duration {
        Duration::from_millis(self.pop_cooldown_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NavBarConfig {
    /// Whether pages show the navbar unless their content says otherwise.
    #[serde(default = "default_true")]
    pub default_visible: bool,
}

impl Default for NavBarConfig {
    fn default() -> Self {
        Self {
            default_visible: true,
        }
    }
}

/// One entry of the page catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageEntry {
    pub source: String,
    pub title: String,
    pub nav_bar: Option<bool>,
    #[serde(default)]
    pub body: String,
}

impl NavConfig {
    /// Load from the default location.
    ///
    /// Returns `Ok(None)` when no config file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::from_path(&path).map(Some)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Loaded config");
                Ok(config)
            }
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

/// `$NAVSTACK_CONFIG` if set, else `~/.navstack/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    resolve_config_path(env::var_os(CONFIG_ENV_VAR), dirs::home_dir())
}

fn resolve_config_path(env_override: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = env_override.filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(path));
    }
    home.map(|home| home.join(".navstack").join("config.toml"))
}
