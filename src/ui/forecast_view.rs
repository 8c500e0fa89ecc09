//! Forecast screen rendering
//!
//! Renders the search box, the error line and one card per forecast day with
//! the morning, day and night temperatures and the day's humidity.

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, AppState};
use crate::forecast::DaySummary;

/// Placeholder for a value with no data
pub const NO_DATA: &str = "--";

/// Formats an optional temperature, e.g. "12.5°C" or "--"
pub fn format_temperature(temperature: Option<f64>) -> String {
    temperature
        .map(|t| format!("{:.1}°C", t))
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Formats an optional humidity, e.g. "70%" or "--"
pub fn format_humidity(humidity: Option<u8>) -> String {
    humidity
        .map(|h| format!("{}%", h))
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Color for temperature (warmer = more red, cooler = more blue)
fn temperature_color(temperature: Option<f64>) -> Color {
    let Some(temp) = temperature else {
        return Color::DarkGray;
    };

    if temp >= 30.0 {
        Color::Red
    } else if temp >= 25.0 {
        Color::LightRed
    } else if temp >= 20.0 {
        Color::Yellow
    } else if temp >= 15.0 {
        Color::Green
    } else if temp >= 5.0 {
        Color::Cyan
    } else {
        Color::Blue
    }
}

/// Renders the forecast screen
///
/// # Arguments
/// * `frame` - The ratatui Frame to render to
/// * `app` - The application state containing the search input and forecast
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(3), // Search box
            Constraint::Length(1), // Error line
            Constraint::Min(8),    // Day cards
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    render_search_box(frame, app, chunks[1]);
    render_error(frame, app, chunks[2]);
    render_days(frame, app, chunks[3]);
    render_help(frame, app, chunks[4]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "CheckUrWeather",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(location) = &app.location {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            location.clone(),
            Style::default().fg(Color::White),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" City... ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let input = Line::from(vec![
        Span::styled("\u{1F50D} ", Style::default().fg(Color::DarkGray)), // 🔍
        Span::raw(app.city_input.clone()),
        Span::styled("_", Style::default().fg(Color::Yellow)),
    ]);

    frame.render_widget(Paragraph::new(input).block(block), area);
}

fn render_error(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(error) = &app.error {
        let paragraph =
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(paragraph, area);
    }
}

/// Renders the day cards, or a status message when there are none
fn render_days(frame: &mut Frame, app: &App, area: Rect) {
    let message = match (&app.state, &app.forecast) {
        (AppState::Loading, _) => Some("Loading forecast..."),
        (_, None) => Some("Type a city name and press Enter"),
        (_, Some(forecast)) if forecast.is_empty() => Some("No forecast data available"),
        _ => None,
    };

    if let Some(message) = message {
        let paragraph = Paragraph::new(vec![Line::default(), Line::from(message)])
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let Some(forecast) = &app.forecast else {
        return;
    };

    let count = forecast.len() as u32;
    let constraints = vec![Constraint::Ratio(1, count); forecast.len()];
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (day, column) in forecast.iter().zip(columns.iter()) {
        render_day_card(frame, day, *column);
    }
}

fn render_day_card(frame: &mut Frame, day: &DaySummary, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray))
        .title(Span::styled(
            format!(" {} ", day.label),
            Style::default().add_modifier(Modifier::BOLD),
        ));

    let lines = vec![
        Line::default(),
        reading_line("Morning", day.temperature.morning),
        reading_line("Day", day.temperature.midday),
        reading_line("Night", day.temperature.night),
        Line::default(),
        Line::from(vec![
            Span::styled("Humidity: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format_humidity(day.humidity),
                Style::default().fg(Color::LightBlue),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn reading_line(name: &str, temperature: Option<f64>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", name), Style::default().fg(Color::Gray)),
        Span::styled(
            format_temperature(temperature),
            Style::default().fg(temperature_color(temperature)),
        ),
    ])
}

/// Renders the help text at the bottom of the screen with data freshness
fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let mut help_spans = vec![
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Search  "),
        Span::styled("F1", Style::default().fg(Color::Yellow)),
        Span::raw(" Help  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ];

    if let Some(last_refresh) = app.last_refresh {
        let mins_ago = (Local::now() - last_refresh).num_minutes();
        let freshness_text = if mins_ago < 1 {
            " │ Updated just now".to_string()
        } else {
            format!(" │ Updated {}m ago", mins_ago)
        };
        help_spans.push(Span::styled(
            freshness_text,
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph =
        Paragraph::new(Line::from(help_spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
