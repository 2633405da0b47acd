use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::{io::Write, sync::Arc};

use weather_core::{
    CityName, Config, Coordinates, FetchPhase, LocationProvider, StateSubscription, StaticLocation,
    WeatherController, provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather from OpenWeather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key (and optionally a default city).
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name; defaults to the configured city, or Nairobi.
        city: Option<String>,
    },

    /// Show current weather for the configured home location.
    Here,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => {
                let config = Config::load()?.with_env_overrides();
                let raw = city.unwrap_or_else(|| config.default_city().to_string());

                let controller = controller_from_config(&config)?;
                show_city(&controller, &raw, &mut std::io::stdout(), &mut std::io::stderr()).await
            }
            Command::Here => {
                let config = Config::load()?.with_env_overrides();
                let controller = controller_from_config(&config)?;

                let coords = locate(&StaticLocation::new(config.home)).await?;
                eprintln!("Getting weather for your location...");

                let updates = controller.subscribe();
                let _request = controller.fetch_by_coordinates(coords.latitude, coords.longitude);
                present(updates, &mut std::io::stdout(), &mut std::io::stderr()).await
            }
        }
    }
}

fn controller_from_config(config: &Config) -> anyhow::Result<WeatherController> {
    let provider = provider_from_config(config)?;
    Ok(WeatherController::new(Arc::new(provider)))
}

/// Fetch by raw city input; blank input fails before any request is issued.
async fn show_city(
    controller: &WeatherController,
    raw: &str,
    out: &mut impl Write,
    status: &mut impl Write,
) -> anyhow::Result<()> {
    let updates = controller.subscribe();
    let _request = controller.fetch_by_city_input(raw)?;
    present(updates, out, status).await
}

async fn locate(locator: &dyn LocationProvider) -> anyhow::Result<Coordinates> {
    match locator.current_location().await? {
        Some(coords) => Ok(coords),
        None => bail!("Unable to get current location. Try city search."),
    }
}

/// Follow controller state until the fetch settles.
///
/// The card goes to `out`; progress lines go to `status`.
async fn present(
    mut updates: StateSubscription,
    out: &mut impl Write,
    status: &mut impl Write,
) -> anyhow::Result<()> {
    while let Some(state) = updates.recv().await {
        match state.phase() {
            FetchPhase::Idle => {}
            FetchPhase::Loading => writeln!(status, "Loading...")?,
            FetchPhase::Success(snapshot) => {
                writeln!(out, "{}", render::card(snapshot))?;
                return Ok(());
            }
            FetchPhase::Failed(message) => bail!("{message}"),
        }
    }

    bail!("Weather controller stopped before the request finished")
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key.to_string());

    let city = inquire::Text::new("Default city:")
        .with_default(config.default_city())
        .prompt()
        .context("Failed to read default city")?;
    config.default_city = Some(CityName::new(&city)?.to_string());

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}
