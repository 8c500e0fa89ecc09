//! Application state management for CheckUrWeather
//!
//! This module contains the main application state, handling keyboard input
//! in the search box, forecast loading, and state transitions.

use chrono::{DateTime, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{error, info};

use crate::data::{CityIndex, ForecastFeed, WeatherClient};
use crate::forecast::{ForecastAggregator, ForecastResult};

/// Message shown when the typed city is not in the lookup table
pub const INVALID_CITY_MESSAGE: &str = "Please provide a valid city name";

/// Application state enum representing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// No forecast requested yet
    Idle,
    /// A forecast request is in flight
    Loading,
    /// A forecast is displayed
    Ready,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Text typed into the search box
    pub city_input: String,
    /// Validation or fetch error shown under the search box
    pub error: Option<String>,
    /// Name of the city the forecast belongs to
    pub location: Option<String>,
    /// Latest forecast; replaced wholesale on every successful search
    pub forecast: Option<ForecastResult>,
    /// Timestamp of the last successful search
    pub last_refresh: Option<DateTime<Local>>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating a search has been requested
    pub search_requested: bool,
    /// City name lookup
    cities: CityIndex,
    /// Forecast API client
    weather_client: WeatherClient,
    /// Daily aggregation settings
    aggregator: ForecastAggregator,
}

impl App {
    /// Creates a new App instance with an empty search box
    pub fn new(
        cities: CityIndex,
        weather_client: WeatherClient,
        aggregator: ForecastAggregator,
    ) -> Self {
        Self {
            state: AppState::Idle,
            city_input: String::new(),
            error: None,
            location: None,
            forecast: None,
            last_refresh: None,
            should_quit: false,
            show_help: false,
            search_requested: false,
            cities,
            weather_client,
            aggregator,
        }
    }

    /// Pre-fills the search box and requests a search if the city is known
    pub fn with_initial_city(mut self, city: &str) -> Self {
        self.city_input = city.to_string();
        self.request_search();
        self
    }

    /// Returns the configured number of forecast days
    pub fn horizon_days(&self) -> usize {
        self.aggregator.horizon_days()
    }

    /// Looks up the id of the typed city
    pub fn city_id(&self) -> Option<u64> {
        self.cities.lookup(&self.city_input)
    }

    /// Re-checks the typed city and updates the error line
    fn validate_city(&mut self) {
        self.error = if self.city_input.trim().is_empty() || self.city_id().is_some() {
            None
        } else {
            Some(INVALID_CITY_MESSAGE.to_string())
        };
    }

    /// Flags a search when the typed city resolves, otherwise shows the lookup error
    pub fn request_search(&mut self) {
        if self.city_id().is_some() {
            self.error = None;
            self.search_requested = true;
        } else if !self.city_input.trim().is_empty() {
            self.error = Some(INVALID_CITY_MESSAGE.to_string());
        }
    }

    /// Fetches and aggregates the forecast for the typed city
    ///
    /// On failure the previous forecast, if any, stays on screen and the error
    /// is shown on the error line.
    pub async fn search(&mut self) {
        self.search_requested = false;

        let Some(city_id) = self.city_id() else {
            self.error = Some(INVALID_CITY_MESSAGE.to_string());
            return;
        };

        self.state = AppState::Loading;
        info!("Searching forecast for '{}' (id {})", self.city_input.trim(), city_id);

        match self.weather_client.fetch_feed(city_id).await {
            Ok(feed) => self.apply_feed(feed, Local::now().date_naive()),
            Err(e) => {
                error!("Forecast request for city id {} failed: {}", city_id, e);
                self.error = Some(e.to_string());
                self.state = if self.forecast.is_some() {
                    AppState::Ready
                } else {
                    AppState::Idle
                };
            }
        }
    }

    /// Replaces the displayed forecast with the aggregation of `feed`
    pub fn apply_feed(&mut self, feed: ForecastFeed, today: NaiveDate) {
        let forecast = self.aggregator.aggregate(&feed.measurements, today);

        self.location = feed
            .city_name
            .or_else(|| Some(self.city_input.trim().to_string()));
        self.forecast = Some(forecast);
        self.last_refresh = Some(Local::now());
        self.error = None;
        self.state = AppState::Ready;
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - Printable characters without Ctrl or Alt: Edit the city name
    /// - `Backspace`: Delete the last character
    /// - `Enter`: Search the forecast for the typed city
    /// - `F1`: Toggle help
    /// - `Esc`: Close help, otherwise quit
    /// - `Ctrl-C`: Quit
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            if matches!(key_event.code, KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            return;
        }

        if self.state == AppState::Loading {
            if key_event.code == KeyCode::Esc {
                self.should_quit = true;
            }
            return;
        }

        match key_event.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::F(1) => {
                self.show_help = true;
            }
            KeyCode::Enter => {
                self.request_search();
            }
            KeyCode::Backspace => {
                self.city_input.pop();
                self.validate_city();
            }
            KeyCode::Char(_)
                if key_event
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
            KeyCode::Char(c) => {
                self.city_input.push(c);
                self.validate_city();
            }
            _ => {}
        }
    }
}
