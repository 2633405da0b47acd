use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

use crate::{
    Config, FetchError, WeatherQuery, WeatherSnapshot,
    provider::openweather::{DEFAULT_BASE_URL, OpenWeatherProvider},
};

pub mod openweather;

/// Source of current-weather snapshots. One call, one outbound request.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, FetchError>;
}

const USER_AGENT: &str = concat!("weather-core/", env!("CARGO_PKG_VERSION"));

/// Construct the OpenWeather provider from config (API key and optional base URL).
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key()?;

    let http = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")?;

    let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
    Ok(OpenWeatherProvider::with_client(http, api_key, base_url))
}
