//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//! 1. Built-in defaults
//! 2. A TOML file (`--config PATH`, or `vidsweep/config.toml` in the platform
//!    config directory)
//! 3. Environment variables prefixed with `VIDSWEEP_`
//! 4. Command-line flags that were actually given
//!
//! # Example
//!
//! ```toml
//! algorithm = "blake3"
//! extensions = ["mp4", "mkv", "webm"]
//! order = "name"
//! io_threads = 4
//! chunk_size = 65536
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;
use crate::duplicates::DedupConfig;
use crate::scanner::{
    ExtensionFilter, HashAlgorithm, OrderPolicy, WalkerConfig, DEFAULT_CHUNK_SIZE,
    DEFAULT_EXTENSIONS,
};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "VIDSWEEP_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has values of the wrong type.
    #[error("Invalid configuration: {0}")]
    Parse(Box<figment::Error>),

    /// The merged values are out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Parse(Box::new(error))
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content digest used to compare files.
    pub algorithm: HashAlgorithm,
    /// Accepted video extensions, without the dot.
    pub extensions: Vec<String>,
    /// Directory visit order.
    pub order: OrderPolicy,
    /// Hashing threads; 1 is sequential.
    pub io_threads: usize,
    /// Read buffer size used while hashing, in bytes.
    pub chunk_size: usize,
    /// Follow symbolic links during traversal.
    pub follow_symlinks: bool,
    /// Skip dotfiles and dot-directories.
    pub skip_hidden: bool,
    /// Report duplicates without deleting them.
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            order: OrderPolicy::default(),
            io_threads: 1,
            chunk_size: DEFAULT_CHUNK_SIZE,
            follow_symlinks: false,
            skip_hidden: false,
            dry_run: false,
        }
    }
}

impl Config {
    /// Default platform-specific configuration file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "vidsweep").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Figment with defaults, the given TOML file and the environment.
    ///
    /// A missing file contributes nothing.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load and validate configuration.
    ///
    /// `explicit` is the `--config` path; it must exist. Without it the
    /// default path is used if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit file is missing, a layer fails
    /// to parse, or a value is out of range.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.is_file()),
        };

        match &file {
            Some(path) => log::debug!("Loading config from {}", path.display()),
            None => log::debug!("No config file, using defaults and environment"),
        }

        let config: Self = Self::figment(file.as_deref()).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.io_threads == 0 {
            return Err(ConfigError::Invalid("io_threads must be at least 1".into()));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be at least 1".into()));
        }
        if self.extension_filter().is_empty() {
            return Err(ConfigError::Invalid(
                "extensions must name at least one extension".into(),
            ));
        }
        Ok(())
    }

    /// Override values with the flags given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(algorithm) = cli.algorithm {
            self.algorithm = algorithm;
        }
        if let Some(order) = cli.order {
            self.order = order;
        }
        if let Some(threads) = cli.io_threads {
            self.io_threads = usize::from(threads);
        }
        if let Some(size) = cli.chunk_size {
            self.chunk_size = usize::try_from(size).unwrap_or(usize::MAX);
        }
        if !cli.extensions.is_empty() {
            self.extensions.clone_from(&cli.extensions);
        }
        self.follow_symlinks |= cli.follow_symlinks;
        self.skip_hidden |= cli.skip_hidden;
        self.dry_run |= cli.dry_run;
    }

    /// Normalized extension filter.
    #[must_use]
    pub fn extension_filter(&self) -> ExtensionFilter {
        ExtensionFilter::new(&self.extensions)
    }

    /// Traversal options.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(self.follow_symlinks, self.skip_hidden, self.order)
    }

    /// Sweep configuration without shutdown flag or observer.
    #[must_use]
    pub fn dedup_config(&self) -> DedupConfig {
        DedupConfig::default()
            .with_extensions(self.extension_filter())
            .with_algorithm(self.algorithm)
            .with_chunk_size(self.chunk_size)
            .with_io_threads(self.io_threads)
            .with_dry_run(self.dry_run)
            .with_walker_config(self.walker_config())
    }
}
