//! Application configuration management.
//!
//! Scan settings are layered with `figment`, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file (platform config directory, or `--config PATH`)
//! 3. `PROMPTDUPE_*` environment variables
//! 4. CLI flags, applied with [`Config::merge_scan_args`]
//!
//! # Example
//!
//! ```toml
//! max_items = 2000
//! timeout_ms = 30000
//! content_threshold = 0.95
//! ```

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::ScanArgs;
use crate::duplicates::scanner::{
    DEFAULT_CONTENT_THRESHOLD, DEFAULT_MAX_ITEMS, DEFAULT_TIMEOUT_MS, DEFAULT_TITLE_THRESHOLD,
    DEFAULT_YIELD_INTERVAL_MS,
};
use crate::duplicates::ScanOptions;

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "PROMPTDUPE_";

/// Keys accepted in the configuration file.
pub const KNOWN_KEYS: &[&str] = &[
    "max_items",
    "allow_large_datasets",
    "timeout_ms",
    "yield_interval_ms",
    "title_threshold",
    "content_threshold",
];

/// Minimum Jaro-Winkler score for a "did you mean" suggestion.
const SUGGESTION_CUTOFF: f64 = 0.8;

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No platform configuration directory could be determined.
    #[error("Failed to determine the configuration directory")]
    NoConfigDir,

    /// A config file named on the command line does not exist.
    #[error("Config file {} not found", .0.display())]
    NotFound(PathBuf),

    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// Path to the config file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML.
    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        /// Path to the config file
        path: PathBuf,
        /// The underlying parse error
        #[source]
        source: toml::de::Error,
    },

    /// A layer held a value of the wrong type.
    #[error("Invalid configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
}

/// Scan configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Largest collection scanned without confirmation.
    pub max_items: usize,
    /// Scan collections above `max_items` without asking.
    pub allow_large_datasets: bool,
    /// Wall-clock budget for a scan in milliseconds.
    pub timeout_ms: u64,
    /// Minimum time between cooperative yields in milliseconds.
    pub yield_interval_ms: u64,
    /// Title similarity cutoff.
    pub title_threshold: f64,
    /// Content similarity cutoff.
    pub content_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            allow_large_datasets: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            yield_interval_ms: DEFAULT_YIELD_INTERVAL_MS,
            title_threshold: DEFAULT_TITLE_THRESHOLD,
            content_threshold: DEFAULT_CONTENT_THRESHOLD,
        }
    }
}

/// A key in the configuration file that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey {
    /// The key as written
    pub key: String,
    /// The closest known key, if any is close enough
    pub suggestion: Option<&'static str>,
}

impl std::fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.suggestion {
            Some(suggestion) => write!(
                f,
                "Unknown config key '{}' (did you mean '{}'?)",
                self.key, suggestion
            ),
            None => write!(f, "Unknown config key '{}'", self.key),
        }
    }
}

impl Config {
    /// Load the configuration from `explicit`, or from the default path.
    ///
    /// Falls back to defaults (plus environment) when no file can be used.
    /// A missing `explicit` file is warned about; a missing default file is not.
    #[must_use]
    pub fn load(explicit: Option<&Path>) -> Self {
        match Self::try_load(explicit) {
            Ok(config) => config,
            Err(ConfigError::NoConfigDir) => {
                log::debug!("{}, using defaults", ConfigError::NoConfigDir);
                Self::load_from_path(PathBuf::new())
            }
            Err(e @ ConfigError::NotFound(_)) => {
                log::warn!("{}; using defaults", e);
                Self::load_from_path(PathBuf::new())
            }
            Err(e) => {
                log::warn!("{}; using default configuration", e);
                Self::default()
            }
        }
    }

    /// Load the configuration from `explicit`, or from the default path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `explicit` is not a file,
    /// [`ConfigError::NoConfigDir`] if there is no default location, or any
    /// error of [`Config::try_load_from_path`].
    pub fn try_load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => path.to_path_buf(),
            None => Self::require_default_path()?,
        };
        Self::try_load_from_path(&path)
    }

    /// Load the configuration from `path`, falling back to defaults on error.
    #[must_use]
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        match Self::try_load_from_path(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}; using default configuration", e);
                Self::default()
            }
        }
    }

    /// Load the configuration from `path`.
    ///
    /// A missing file is not an error. Unknown keys are logged as warnings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, is not valid TOML,
    /// or any layer holds a value of the wrong type.
    pub fn try_load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if path.is_file() {
            let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            })?;
            for unknown in unknown_keys(&content).map_err(|e| ConfigError::Toml {
                path: path.to_path_buf(),
                source: e,
            })? {
                log::warn!("{} in {}", unknown, path.display());
            }
            log::debug!("Loading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(Box::new)?;
        Ok(config)
    }

    /// Default configuration file location for this platform.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "promptdupe", "promptdupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Default configuration file location, or an error if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] on platforms without a home directory.
    pub fn require_default_path() -> Result<PathBuf, ConfigError> {
        Self::default_path().ok_or(ConfigError::NoConfigDir)
    }

    /// Apply the options given on the command line.
    pub fn merge_scan_args(&mut self, args: &ScanArgs) {
        if let Some(max_items) = args.max_items {
            self.max_items = max_items;
        }
        if args.allow_large {
            self.allow_large_datasets = true;
        }
        if let Some(timeout_ms) = args.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(interval) = args.yield_interval_ms {
            self.yield_interval_ms = interval;
        }
        if let Some(threshold) = args.title_threshold {
            self.title_threshold = threshold;
        }
        if let Some(threshold) = args.content_threshold {
            self.content_threshold = threshold;
        }
    }

    /// Build scan options from this configuration.
    ///
    /// Callbacks, the shutdown flag and the yielder keep their defaults.
    #[must_use]
    pub fn to_scan_options(&self) -> ScanOptions {
        ScanOptions::default()
            .with_max_items(self.max_items)
            .with_allow_large_datasets(self.allow_large_datasets)
            .with_timeout_ms(self.timeout_ms)
            .with_yield_interval_ms(self.yield_interval_ms)
            .with_title_threshold(self.title_threshold)
            .with_content_threshold(self.content_threshold)
    }
}

/// Find keys in a TOML document that are not configuration keys.
///
/// # Errors
///
/// Returns the parse error if `content` is not valid TOML.
pub fn unknown_keys(content: &str) -> Result<Vec<UnknownKey>, toml::de::Error> {
    let table: toml::Table = content.parse()?;
    Ok(table
        .keys()
        .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
        .map(|key| UnknownKey {
            key: key.clone(),
            suggestion: suggest_key(key),
        })
        .collect())
}

/// Closest known key to `key`.
fn suggest_key(key: &str) -> Option<&'static str> {
    KNOWN_KEYS
        .iter()
        .map(|known| (*known, strsim::jaro_winkler(key, known)))
        .filter(|(_, score)| *score > SUGGESTION_CUTOFF)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(known, _)| known)
}
