//! Non-interactive forecast output for --print
//!
//! Formats a forecast as plain text cards or as JSON for scripting.

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::forecast::ForecastResult;

use super::forecast_view::{format_humidity, format_temperature};

/// JSON document written by `--format json`
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    location: &'a str,
    days: &'a ForecastResult,
}

/// Renders the forecast in the requested format
///
/// # Arguments
/// * `location` - Resolved city name, printed above the text cards or stored
///   under `location` in JSON
/// * `forecast` - The aggregated forecast
/// * `format` - Text or JSON
pub fn render(
    location: &str,
    forecast: &ForecastResult,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(location, forecast)),
        OutputFormat::Json => serde_json::to_string_pretty(&JsonReport {
            location,
            days: forecast,
        }),
    }
}

/// Renders one block of text per day
pub fn render_text(location: &str, forecast: &ForecastResult) -> String {
    let mut lines = vec![location.to_string()];

    if forecast.is_empty() {
        lines.push("No forecast data available".to_string());
    }

    for day in forecast {
        lines.push(String::new());
        lines.push(day.label.clone());
        lines.push(format!("  Morning:  {}", format_temperature(day.temperature.morning)));
        lines.push(format!("  Day:      {}", format_temperature(day.temperature.midday)));
        lines.push(format!("  Night:    {}", format_temperature(day.temperature.night)));
        lines.push(format!("  Humidity: {}", format_humidity(day.humidity)));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Measurement;
    use crate::forecast::{aggregate, SlotHours};
    use chrono::NaiveDate;

    fn sample_forecast() -> ForecastResult {
        let feed = vec![
            Measurement::parse("2024-07-15 06:00:00", 10.0, 80.0).unwrap(),
            Measurement::parse("2024-07-15 21:00:00", 5.0, 60.0).unwrap(),
        ];
        aggregate(
            &feed,
            2,
            SlotHours::default(),
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
        )
    }

    #[test]
    fn test_render_text() {
        let text = render_text("London", &sample_forecast());

        let expected = "London\n\
            \n\
            Mon Jul 15 2024\n\
            \x20 Morning:  10.0°C\n\
            \x20 Day:      --\n\
            \x20 Night:    5.0°C\n\
            \x20 Humidity: 70%\n\
            \n\
            Tue Jul 16 2024\n\
            \x20 Morning:  --\n\
            \x20 Day:      --\n\
            \x20 Night:    --\n\
            \x20 Humidity: --\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_text_empty() {
        let text = render_text("Paris", &ForecastResult::default());
        assert_eq!(text, "Paris\nNo forecast data available\n");
    }

    #[test]
    fn test_render_json() {
        let json = render("London", &sample_forecast(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["location"], "London");
        let days = value["days"].as_array().expect("Days should be a JSON array");
        assert_eq!(days.len(), 2);
        assert_eq!(days[0]["label"], "Mon Jul 15 2024");
        assert_eq!(days[0]["temperature"]["morning"], 10.0);
        assert!(days[0]["temperature"]["midday"].is_null());
        assert_eq!(days[0]["humidity"], 70);
        assert!(days[1]["humidity"].is_null());
    }

    #[test]
    fn test_render_json_empty_forecast() {
        let json = render("Paris", &ForecastResult::default(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["location"], "Paris");
        assert_eq!(value["days"], serde_json::json!([]));
    }

    #[test]
    fn test_render_dispatches_text() {
        let text = render("London", &sample_forecast(), OutputFormat::Text).unwrap();
        assert!(text.starts_with("London\n"));
    }
}
