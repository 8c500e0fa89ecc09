//! Configuration file handling
//!
//! Settings are read from a TOML file. Every section and key is optional, so
//! a missing file yields the defaults. The API key can also be supplied
//! through the `OPENWEATHER_API_KEY` environment variable, which wins over
//! the file.

use directories::ProjectDirs;
use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data::weather::{DEFAULT_UNITS, OPEN_WEATHER_BASE_URL};
use crate::forecast::{
    ForecastAggregator, SlotHours, DEFAULT_HORIZON_DAYS, DEFAULT_MIDDAY_HOUR,
    DEFAULT_MORNING_HOUR, DEFAULT_NIGHT_HOUR,
};

/// Environment variable holding the OpenWeatherMap API key
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Errors that can occur when loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub key: Option<String>,
    pub base_url: String,
    pub units: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            base_url: OPEN_WEATHER_BASE_URL.to_string(),
            units: DEFAULT_UNITS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub horizon_days: usize,
    pub morning_hour: u32,
    pub midday_hour: u32,
    pub night_hour: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            morning_hour: DEFAULT_MORNING_HOUR,
            midday_hour: DEFAULT_MIDDAY_HOUR,
            night_hour: DEFAULT_NIGHT_HOUR,
        }
    }
}

impl ForecastConfig {
    /// Builds the aggregator described by this section
    pub fn aggregator(&self) -> Result<ForecastAggregator, ConfigError> {
        let slots = SlotHours::new(self.morning_hour, self.midday_hour, self.night_hour)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        ForecastAggregator::new(self.horizon_days, slots)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CitiesConfig {
    /// Path to the provider's `city.list.json`; the built-in table is used when unset
    pub list_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct General {
    pub log_level: LevelFilter,
    pub log_path: Option<PathBuf>,
}

impl Default for General {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Warn,
            log_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub forecast: ForecastConfig,
    pub cities: CitiesConfig,
    pub general: General,
}

impl Config {
    /// Parses and validates a TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml)?;
        config.forecast.aggregator()?;
        Ok(config)
    }

    /// Applies environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.key = Some(key);
            }
        }
        self
    }
}

/// Returns the default config file location, e.g. `~/.config/checkurweather/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "checkurweather")?;
    Some(project_dirs.config_dir().join("config.toml"))
}

/// Returns the default log file location used by the interactive UI
pub fn default_log_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "checkurweather")?;
    Some(project_dirs.data_local_dir().join("checkurweather.log"))
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - explicit path to the configuration file; when `None` the
///   default location is used and a missing file falls back to defaults
pub fn load_config(config_path: Option<&Path>) -> Result<Config, ConfigError> {
    let config = match config_path {
        Some(path) => Config::from_toml_str(&fs::read_to_string(path)?)?,
        None => match default_config_path() {
            Some(path) if path.exists() => Config::from_toml_str(&fs::read_to_string(path)?)?,
            _ => Config::default(),
        },
    };

    Ok(config.with_env_overrides())
}
