//! Configuration loading with figment.
//!
//! Configuration is merged from, in increasing priority:
//! 1. a TOML file (`config/aro_power.toml` by default)
//! 2. environment variables prefixed with `ARO_`, nested with `__`
//!    (e.g. `ARO_APPLICATION__LOG_LEVEL=debug`, `ARO_SOURCE__SCRUNCH=4`)
//!
//! # Example
//! ```no_run
//! use aro_power::config::AroConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AroConfig::load_from("config/aro_power.toml")?;
//! config.validate()?;
//! println!("{}: {:?}", config.application.name, config.source);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use aro_core::AcquisitionConfig;
use aro_driver_mock::SyntheticConfig;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::{parse_log_level, LOG_LEVELS};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/aro_power.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "ARO_";

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File or environment could not be parsed into [`AroConfig`].
    #[error("Failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    /// Values parsed but failed validation.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AroConfig {
    /// Name and logging
    #[serde(default)]
    pub application: ApplicationConfig,
    /// Frame layout and window policy
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
    /// Which record source to open
    pub source: SourceConfig,
}

/// Application-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name, used in log events
    #[serde(default = "default_name")]
    pub name: String,
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

/// Record source selection, tagged by `kind`.
///
/// ```toml
/// [source]
/// kind = "ring"
/// path = "/dev/shm/aro_power.dat"
/// scrunch = 4
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Ring file written by a live producer.
    Ring {
        /// Backing file
        path: PathBuf,
        /// Raw frames integrated per output sample
        #[serde(default = "default_scrunch")]
        scrunch: usize,
    },
    /// Simulated producer, for running without hardware.
    Synthetic {
        /// Raw frames integrated per output sample
        #[serde(default = "default_scrunch")]
        scrunch: usize,
        /// Simulated producer parameters
        #[serde(default)]
        synthetic: SyntheticConfig,
    },
}

impl SourceConfig {
    /// Scrunch factor of either variant.
    pub fn scrunch(&self) -> usize {
        match self {
            Self::Ring { scrunch, .. } | Self::Synthetic { scrunch, .. } => *scrunch,
        }
    }
}

fn default_name() -> String {
    "aro-power".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_scrunch() -> usize {
    1
}

impl AroConfig {
    /// Load from [`DEFAULT_CONFIG_PATH`] and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load from a specific file and the environment.
    ///
    /// A missing file is not an error; every value can come from the
    /// environment instead.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Ok(Self::figment(path).extract()?)
    }

    /// The merged providers, for callers that extract their own sections.
    pub fn figment<P: AsRef<Path>>(path: P) -> Figment {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if parse_log_level(&self.application.log_level).is_err() {
            return Err(ConfigError::Invalid(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        self.acquisition
            .validate()
            .and_then(|()| self.acquisition.validate_scrunch(self.source.scrunch()))
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        match &self.source {
            SourceConfig::Ring { path, .. } if path.as_os_str().is_empty() => Err(
                ConfigError::Invalid("ring source needs a non-empty path".to_string()),
            ),
            SourceConfig::Synthetic { synthetic, .. } => synthetic
                .validate()
                .map_err(|e| ConfigError::Invalid(e.to_string())),
            SourceConfig::Ring { .. } => Ok(()),
        }
    }
}
