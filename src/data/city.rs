//! City name lookup for the forecast API
//!
//! The forecast endpoint is queried by numeric city id. This module maps a
//! free-text city name to that id, either from a small built-in table or from
//! the provider's full `city.list.json`.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// A city known to the forecast provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct City {
    /// Provider city id
    pub id: u64,
    /// City name as listed by the provider
    pub name: String,
}

/// Errors that can occur when loading a city list
#[derive(Debug, Error)]
pub enum CityError {
    /// The city list file could not be read
    #[error("Failed to read city list: {0}")]
    Io(#[from] std::io::Error),

    /// The city list is not a JSON array of cities
    #[error("Failed to parse city list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Built-in cities with their OpenWeatherMap ids
static BUILTIN_CITIES: [(u64, &str); 16] = [
    (2643743, "London"),
    (2988507, "Paris"),
    (2950159, "Berlin"),
    (3117735, "Madrid"),
    (3169070, "Rome"),
    (756135, "Warsaw"),
    (3094802, "Kraków"),
    (3081368, "Wrocław"),
    (3099434, "Gdańsk"),
    (524901, "Moscow"),
    (5128581, "New York"),
    (5368361, "Los Angeles"),
    (6173331, "Vancouver"),
    (1850147, "Tokyo"),
    (2147714, "Sydney"),
    (2759794, "Amsterdam"),
];

/// Name-to-id lookup table
#[derive(Debug, Clone, Default)]
pub struct CityIndex {
    cities: Vec<City>,
}

impl CityIndex {
    /// Creates an index from the given cities
    pub fn new(cities: Vec<City>) -> Self {
        Self { cities }
    }

    /// Creates an index from the built-in city table
    pub fn builtin() -> Self {
        let cities = BUILTIN_CITIES
            .iter()
            .map(|(id, name)| City {
                id: *id,
                name: name.to_string(),
            })
            .collect();
        Self { cities }
    }

    /// Parses a provider city list (a JSON array of objects with `id` and `name`)
    pub fn from_json_str(json: &str) -> Result<Self, CityError> {
        let cities: Vec<City> = serde_json::from_str(json)?;
        Ok(Self { cities })
    }

    /// Loads a provider city list from disk
    ///
    /// # Arguments
    /// * `path` - Path to a `city.list.json` file
    pub fn from_json_file(path: &Path) -> Result<Self, CityError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Returns the id of the first city whose name matches exactly
    ///
    /// Leading and trailing whitespace of `name` is ignored; the comparison is
    /// otherwise case-sensitive. Returns `None` for an empty name.
    pub fn lookup(&self, name: &str) -> Option<u64> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        self.cities
            .iter()
            .find(|city| city.name == name)
            .map(|city| city.id)
    }
}
