//! Core data models for CheckUrWeather
//!
//! This module contains the measurement record parsed from the forecast feed,
//! along with the city lookup table and the forecast API client.

pub mod city;
pub mod weather;

pub use city::{City, CityError, CityIndex};
pub use weather::{ForecastFeed, WeatherClient, WeatherError};

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

/// Format of the `dt_txt` field in forecast feed entries
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A chronologically ordered list of measurements, as delivered by the API
pub type RawForecastFeed = Vec<Measurement>;

/// Error returned when a feed entry carries an unparseable timestamp
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid measurement timestamp: '{0}'")]
pub struct ParseTimestampError(pub String);

/// A single point-in-time forecast sample
///
/// The timestamp is the local wall-clock time reported by the provider and is
/// parsed exactly once, when the record is built from its raw form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawMeasurement")]
pub struct Measurement {
    /// Local wall-clock time of the sample
    pub timestamp: NaiveDateTime,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: f64,
}

impl Measurement {
    /// Creates a measurement from an already parsed timestamp
    pub fn new(timestamp: NaiveDateTime, temperature: f64, humidity: f64) -> Self {
        Self {
            timestamp,
            temperature,
            humidity,
        }
    }

    /// Creates a measurement from the provider's text timestamp
    ///
    /// # Arguments
    /// * `dt_txt` - Timestamp in `YYYY-MM-DD HH:MM:SS` format
    /// * `temperature` - Temperature in Celsius
    /// * `humidity` - Relative humidity percentage
    ///
    /// # Returns
    /// * `Ok(Measurement)` if the timestamp parses
    /// * `Err(ParseTimestampError)` otherwise
    pub fn parse(
        dt_txt: &str,
        temperature: f64,
        humidity: f64,
    ) -> Result<Self, ParseTimestampError> {
        let timestamp = NaiveDateTime::parse_from_str(dt_txt, TIMESTAMP_FORMAT)
            .map_err(|_| ParseTimestampError(dt_txt.to_string()))?;

        Ok(Self::new(timestamp, temperature, humidity))
    }
}

/// Wire shape of a feed entry; only the consumed fields are declared
#[derive(Debug, Deserialize)]
struct RawMeasurement {
    dt_txt: String,
    main: RawMain,
}

#[derive(Debug, Deserialize)]
struct RawMain {
    temp: f64,
    humidity: f64,
}

impl TryFrom<RawMeasurement> for Measurement {
    type Error = ParseTimestampError;

    fn try_from(raw: RawMeasurement) -> Result<Self, Self::Error> {
        Measurement::parse(&raw.dt_txt, raw.main.temp, raw.main.humidity)
    }
}
