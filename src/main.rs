//! CheckUrWeather - Daily forecast summaries in the terminal
//!
//! Looks up a city, fetches its 3-hourly forecast from OpenWeatherMap and
//! shows one card per day with morning, day and night temperatures.

use std::io;
use std::panic;
use std::process;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};

use checkurweather::app::{App, AppState, INVALID_CITY_MESSAGE};
use checkurweather::cli::{Cli, OutputFormat, StartupConfig};
use checkurweather::config::{default_log_path, load_config, Config};
use checkurweather::data::{CityError, CityIndex, WeatherClient};
use checkurweather::forecast::ForecastAggregator;
use checkurweather::logging;
use checkurweather::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    ui::render_forecast(frame, app);

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Loads the configured city list, or the built-in table
fn load_cities(config: &Config) -> Result<CityIndex, CityError> {
    match &config.cities.list_path {
        Some(path) => {
            let cities = CityIndex::from_json_file(path)?;
            info!("Loaded {} cities from {}", cities.len(), path.display());
            Ok(cities)
        }
        None => Ok(CityIndex::builtin()),
    }
}

/// Fetches the forecast once and writes it to stdout
async fn print_forecast(
    city: &str,
    cities: &CityIndex,
    client: &WeatherClient,
    aggregator: &ForecastAggregator,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let city_id = cities.lookup(city).ok_or(INVALID_CITY_MESSAGE)?;
    let feed = client.fetch_feed(city_id).await?;
    let forecast = aggregator.aggregate(&feed.measurements, Local::now().date_naive());
    let location = feed.city_name.unwrap_or_else(|| city.to_string());

    let output = ui::report::render(&location, &forecast, format)?;
    println!("{}", output.trim_end());
    Ok(())
}

/// Runs the event loop until the user quits
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if app.search_requested {
            // Show the loading state before blocking on the request
            app.state = AppState::Loading;
            terminal.draw(|f| render_ui(f, app))?;
            app.search().await;
            continue;
        }

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let startup = match StartupConfig::from_cli(&cli) {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(days) = startup.horizon_days {
        config.forecast.horizon_days = days;
    }
    let aggregator = config.forecast.aggregator()?;

    // The UI owns the terminal, so its log goes to a file
    let log_path = if startup.print_only {
        config.general.log_path.clone()
    } else {
        config.general.log_path.clone().or_else(default_log_path)
    };
    logging::init(config.general.log_level, log_path.as_deref())?;

    let cities = load_cities(&config)?;
    let client = WeatherClient::new(
        config.api.base_url.clone(),
        config.api.key.clone(),
        config.api.units.clone(),
    );

    if startup.print_only {
        let city = startup.initial_city.as_deref().unwrap_or_default();
        if let Err(e) = print_forecast(city, &cities, &client, &aggregator, startup.format).await {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
        return Ok(());
    }

    let mut app = App::new(cities, client, aggregator);
    if let Some(city) = &startup.initial_city {
        app = app.with_initial_city(city);
    }

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result?;
    Ok(())
}
