//! CheckUrWeather Library
//!
//! Daily forecast summaries built from the OpenWeatherMap 3-hourly feed. The
//! aggregation lives in [`forecast`]; the remaining modules are the terminal
//! front end around it.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod forecast;
pub mod logging;
pub mod ui;
