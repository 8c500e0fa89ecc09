//! OpenWeatherMap forecast API client
//!
//! This module fetches the 5-day / 3-hour forecast for a city id and parses it
//! into a feed of [`Measurement`]s.

use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{Measurement, RawForecastFeed};

/// Base URL for the OpenWeatherMap API
pub const OPEN_WEATHER_BASE_URL: &str = "http://api.openweathermap.org/data/2.5";

/// Units requested from the API; the aggregator expects Celsius
pub const DEFAULT_UNITS: &str = "metric";

/// Errors that can occur when fetching forecast data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The API answered with an error status
    #[error("Forecast API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// No API key was configured
    #[error("No API key configured; set OPENWEATHER_API_KEY or api.key in the config file")]
    MissingApiKey,
}

/// A parsed forecast feed together with the provider's city name
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastFeed {
    /// City name reported by the provider, if any
    pub city_name: Option<String>,
    /// Measurements in the order the provider sent them
    pub measurements: RawForecastFeed,
}

/// Client for fetching forecast feeds from OpenWeatherMap
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    units: String,
}

impl WeatherClient {
    /// Create a new WeatherClient
    ///
    /// # Arguments
    /// * `base_url` - API base URL, without trailing slash
    /// * `api_key` - OpenWeatherMap application id; requests fail without one
    /// * `units` - Unit system requested from the API
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        units: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key,
            units: units.into(),
        }
    }

    /// Create a new WeatherClient with a custom HTTP client
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Builds the forecast URL for a city id
    fn forecast_url(&self, city_id: u64, api_key: &str) -> String {
        format!(
            "{}/forecast?id={}&units={}&appid={}",
            self.base_url.trim_end_matches('/'),
            city_id,
            self.units,
            api_key
        )
    }

    /// Fetch the forecast feed for the given city id
    ///
    /// # Returns
    /// * `Ok(ForecastFeed)` - Parsed measurements for the city
    /// * `Err(WeatherError)` - If no key is configured, or the request or parsing fails
    pub async fn fetch_feed(&self, city_id: u64) -> Result<ForecastFeed, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let url = self.forecast_url(city_id, api_key);

        debug!("Requesting forecast for city id {}", city_id);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(parse_api_error(status.as_u16(), &text));
        }

        let feed = parse_forecast_response(&text)?;
        info!(
            "Fetched {} measurements for city id {}",
            feed.measurements.len(),
            city_id
        );
        Ok(feed)
    }
}

/// Parse the body of a successful forecast response
pub fn parse_forecast_response(text: &str) -> Result<ForecastFeed, WeatherError> {
    let response: ForecastResponse = serde_json::from_str(text)?;

    Ok(ForecastFeed {
        city_name: response.city.map(|city| city.name),
        measurements: response.list,
    })
}

/// Map an error response to a WeatherError, using the provider's message when present
fn parse_api_error(status: u16, text: &str) -> WeatherError {
    let message = serde_json::from_str::<ApiErrorBody>(text)
        .map(|body| body.message)
        .unwrap_or_else(|_| text.trim().to_string());

    WeatherError::Api { status, message }
}

/// OpenWeatherMap forecast response structure
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<Measurement>,
    #[serde(default)]
    city: Option<CityInfo>,
}

/// City block of the forecast response
#[derive(Debug, Deserialize)]
struct CityInfo {
    name: String,
}

/// Error body returned by OpenWeatherMap, e.g. `{"cod": "404", "message": "city not found"}`
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    /// Sample forecast response, trimmed to three entries
    const VALID_RESPONSE: &str = r#"{
        "cod": "200",
        "message": 0,
        "cnt": 3,
        "list": [
            {
                "dt": 1721044800,
                "main": {
                    "temp": 18.3,
                    "feels_like": 17.9,
                    "temp_min": 17.1,
                    "temp_max": 18.3,
                    "pressure": 1016,
                    "humidity": 71
                },
                "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
                "clouds": {"all": 75},
                "wind": {"speed": 3.6, "deg": 250},
                "dt_txt": "2024-07-15 12:00:00"
            },
            {
                "dt": 1721055600,
                "main": {"temp": 19.8, "humidity": 64},
                "dt_txt": "2024-07-15 15:00:00"
            },
            {
                "dt": 1721077200,
                "main": {"temp": 14.2, "humidity": 82},
                "dt_txt": "2024-07-15 21:00:00"
            }
        ],
        "city": {
            "id": 2643743,
            "name": "London",
            "coord": {"lat": 51.5085, "lon": -0.1257},
            "country": "GB",
            "timezone": 3600
        }
    }"#;

    #[test]
    fn test_parse_valid_response() {
        let feed = parse_forecast_response(VALID_RESPONSE).expect("Failed to parse forecast");

        assert_eq!(feed.city_name.as_deref(), Some("London"));
        assert_eq!(feed.measurements.len(), 3);

        let first = &feed.measurements[0];
        assert_eq!(first.timestamp.hour(), 12);
        assert!((first.temperature - 18.3).abs() < 0.01);
        assert!((first.humidity - 71.0).abs() < 0.01);

        let last = &feed.measurements[2];
        assert_eq!(last.timestamp.hour(), 21);
    }

    #[test]
    fn test_parse_response_without_city() {
        let json = r#"{"list": [{"main": {"temp": 1.0, "humidity": 90}, "dt_txt": "2024-01-02 06:00:00"}]}"#;

        let feed = parse_forecast_response(json).expect("Failed to parse forecast");
        assert!(feed.city_name.is_none());
        assert_eq!(feed.measurements.len(), 1);
    }

    #[test]
    fn test_parse_empty_list() {
        let feed = parse_forecast_response(r#"{"list": []}"#).expect("Failed to parse forecast");
        assert!(feed.measurements.is_empty());
    }

    #[test]
    fn test_parse_malformed_json() {
        let result = parse_forecast_response("{ invalid json }");
        assert!(matches!(result, Err(WeatherError::ParseError(_))));
    }

    #[test]
    fn test_parse_missing_list() {
        let result = parse_forecast_response(r#"{"cod": "200"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_bad_timestamp_rejects_feed() {
        let json = r#"{"list": [{"main": {"temp": 1.0, "humidity": 90}, "dt_txt": "2024/01/02 06:00"}]}"#;
        let result = parse_forecast_response(json);
        assert!(matches!(result, Err(WeatherError::ParseError(_))));
    }

    #[test]
    fn test_parse_api_error_with_body() {
        let err = parse_api_error(404, r#"{"cod": "404", "message": "city not found"}"#);
        match err {
            WeatherError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "city not found");
            }
            _ => panic!("Expected Api error"),
        }
    }

    #[test]
    fn test_parse_api_error_with_numeric_code() {
        let err = parse_api_error(401, r#"{"cod": 401, "message": "Invalid API key."}"#);
        assert!(err.to_string().contains("Invalid API key."));
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_parse_api_error_plain_text() {
        let err = parse_api_error(502, "Bad Gateway\n");
        match err {
            WeatherError::Api { message, .. } => assert_eq!(message, "Bad Gateway"),
            _ => panic!("Expected Api error"),
        }
    }

    #[test]
    fn test_forecast_url() {
        let client = WeatherClient::new(OPEN_WEATHER_BASE_URL, Some("key".to_string()), "metric");
        assert_eq!(
            client.forecast_url(2643743, "key"),
            "http://api.openweathermap.org/data/2.5/forecast?id=2643743&units=metric&appid=key"
        );
    }

    #[test]
    fn test_forecast_url_strips_trailing_slash() {
        let client = WeatherClient::new("http://localhost:8080/", None, "imperial");
        assert_eq!(
            client.forecast_url(1, "abc"),
            "http://localhost:8080/forecast?id=1&units=imperial&appid=abc"
        );
    }

    #[tokio::test]
    async fn test_fetch_without_api_key_fails_early() {
        let client = WeatherClient::new(OPEN_WEATHER_BASE_URL, None, DEFAULT_UNITS);
        let result = client.fetch_feed(2643743).await;
        assert!(matches!(result, Err(WeatherError::MissingApiKey)));
    }
}
