//! Command-line interface parsing for CheckUrWeather
//!
//! This module handles parsing of CLI arguments using clap, including the
//! --print flag for a one-shot forecast printout without the terminal UI.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

use crate::forecast::MAX_HORIZON_DAYS;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// --print needs a city to look up
    #[error("A city name is required with --print")]
    MissingCity,

    /// The horizon must be between 1 and MAX_HORIZON_DAYS
    #[error("Invalid number of days: {0}. Expected 1 to {max}", max = MAX_HORIZON_DAYS)]
    InvalidDays(usize),
}

/// Output format for --print
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One block of text per day
    #[default]
    Text,
    /// The location and daily summaries as a JSON object
    Json,
}

/// CheckUrWeather - Five-day forecast summary for a city
#[derive(Parser, Debug)]
#[command(name = "checkurweather")]
#[command(about = "Daily morning, day and night forecast for a city")]
#[command(version)]
pub struct Cli {
    /// City to search for, e.g. "London"
    pub city: Option<String>,

    /// Print the forecast for CITY and exit instead of opening the UI
    #[arg(long)]
    pub print: bool,

    /// Output format used with --print
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Number of forecast days, overriding the config file
    #[arg(long, value_name = "N")]
    pub days: Option<usize>,

    /// Path to the config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupConfig {
    /// City to search for immediately, if any
    pub initial_city: Option<String>,
    /// Whether to print once and exit
    pub print_only: bool,
    /// Output format for print mode
    pub format: OutputFormat,
    /// Horizon override
    pub horizon_days: Option<usize>,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if --print lacks a city or --days is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_city = cli
            .city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .map(str::to_string);

        if cli.print && initial_city.is_none() {
            return Err(CliError::MissingCity);
        }

        if let Some(days) = cli.days {
            if !(1..=MAX_HORIZON_DAYS).contains(&days) {
                return Err(CliError::InvalidDays(days));
            }
        }

        Ok(StartupConfig {
            initial_city,
            print_only: cli.print,
            format: cli.format,
            horizon_days: cli.days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_config_default() {
        let config = StartupConfig::default();
        assert!(config.initial_city.is_none());
        assert!(!config.print_only);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.horizon_days.is_none());
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["checkurweather"]);
        assert!(cli.city.is_none());
        assert!(!cli.print);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_parse_city() {
        let cli = Cli::parse_from(["checkurweather", "London"]);
        assert_eq!(cli.city.as_deref(), Some("London"));
    }

    #[test]
    fn test_cli_parse_print_json() {
        let cli = Cli::parse_from(["checkurweather", "Paris", "--print", "--format", "json"]);
        assert!(cli.print);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_parse_days_and_config() {
        let cli = Cli::parse_from(["checkurweather", "--days", "3", "--config", "/tmp/c.toml"]);
        assert_eq!(cli.days, Some(3));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let result = Cli::try_parse_from(["checkurweather", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_startup_config_from_cli_no_args() {
        let cli = Cli::parse_from(["checkurweather"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config, StartupConfig::default());
    }

    #[test]
    fn test_startup_config_trims_city() {
        let cli = Cli::parse_from(["checkurweather", "  Berlin  "]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.initial_city.as_deref(), Some("Berlin"));
    }

    #[test]
    fn test_startup_config_print_requires_city() {
        let cli = Cli::parse_from(["checkurweather", "--print"]);
        let result = StartupConfig::from_cli(&cli);
        assert!(matches!(result, Err(CliError::MissingCity)));

        let cli = Cli::parse_from(["checkurweather", "  ", "--print"]);
        assert!(StartupConfig::from_cli(&cli).is_err());
    }

    #[test]
    fn test_startup_config_rejects_zero_days() {
        let cli = Cli::parse_from(["checkurweather", "--days", "0"]);
        let err = StartupConfig::from_cli(&cli).unwrap_err();
        assert!(err.to_string().contains("Invalid number of days"));
    }

    #[test]
    fn test_startup_config_print_mode() {
        let cli = Cli::parse_from(["checkurweather", "Tokyo", "--print", "--days", "2"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert!(config.print_only);
        assert_eq!(config.initial_city.as_deref(), Some("Tokyo"));
        assert_eq!(config.horizon_days, Some(2));
    }

    #[test]
    fn test_startup_config_rejects_days_out_of_range() {
        let cli = Cli::parse_from(["checkurweather", "--days", "17"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::InvalidDays(17))
        ));

        let cli = Cli::parse_from(["checkurweather", "--days", "18446744073709551615"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::InvalidDays(usize::MAX))
        ));

        let cli = Cli::parse_from(["checkurweather", "--days", "16"]);
        assert_eq!(StartupConfig::from_cli(&cli).unwrap().horizon_days, Some(16));
    }
}
