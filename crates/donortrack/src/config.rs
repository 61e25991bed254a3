//! Configuration management for donortrack.
//!
//! Configuration is loaded with figment from defaults, an optional TOML file
//! and `DONORTRACK_`-prefixed environment variables.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "donortrack";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "donations.db";

/// Prefix for environment overrides, e.g. `DONORTRACK_LETTERS__OUTPUT_DIR`.
const ENV_PREFIX: &str = "DONORTRACK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `DONORTRACK_`, sections split by `__`)
/// 2. TOML config file at `~/.config/donortrack/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Letter generation configuration.
    pub letters: LettersConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/donortrack/donations.db`
    pub database_path: Option<PathBuf>,
}

/// Letter-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LettersConfig {
    /// Directory letters are written to, relative to the working directory
    /// unless absolute.
    pub output_dir: PathBuf,
    /// Earliest year accepted for a letter run.
    pub min_year: i32,
    /// How many years past the current one a letter run may name.
    pub years_ahead: i32,
}

impl Default for LettersConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("letters"),
            min_year: 2000,
            years_ahead: 5,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and the environment apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.letters.min_year <= 0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "letters.min_year must be positive, got {}",
                    self.letters.min_year
                ),
            });
        }

        if self.letters.years_ahead < 0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "letters.years_ahead cannot be negative, got {}",
                    self.letters.years_ahead
                ),
            });
        }

        if self.letters.output_dir.as_os_str().is_empty() {
            return Err(Error::ConfigValidation {
                message: "letters.output_dir cannot be empty".to_string(),
            });
        }

        if matches!(&self.storage.database_path, Some(p) if p.as_os_str().is_empty()) {
            return Err(Error::ConfigValidation {
                message: "storage.database_path cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// The inclusive range of years a letter run accepts, given the current year.
    #[must_use]
    pub fn letter_year_bounds(&self, current_year: i32) -> (i32, i32) {
        (
            self.letters.min_year,
            current_year.saturating_add(self.letters.years_ahead),
        )
    }
}
