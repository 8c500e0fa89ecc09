//! UI rendering module for CheckUrWeather
//!
//! This module contains the rendering logic for the terminal user interface,
//! using the ratatui library, and the plain output used by --print.

pub mod forecast_view;
pub mod help_overlay;
pub mod report;

pub use forecast_view::render as render_forecast;
pub use help_overlay::render as render_help_overlay;
