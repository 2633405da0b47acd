use async_trait::async_trait;
use reqwest::Client;

use crate::{FetchError, WeatherQuery, WeatherSnapshot};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Client for the OpenWeather `/weather` (current conditions) endpoint.
///
/// Holds one `reqwest::Client`; clones share its connection pool.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self::with_client(Client::new(), api_key, base_url)
    }

    /// Use an existing HTTP client instead of building a new one.
    pub fn with_client(http: Client, api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            endpoint: format!("{}/weather", base_url.trim_end_matches('/')),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn query_params(&self, query: &WeatherQuery) -> Vec<(&'static str, String)> {
        let mut params = match query {
            WeatherQuery::City(name) => vec![("q", name.as_str().to_string())],
            WeatherQuery::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));
        params
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, %query, "requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(network_error)?;

        let status = res.status();
        let body = res.text().await.map_err(network_error)?;

        if !status.is_success() {
            return Err(FetchError::http_status(status, &body));
        }

        WeatherSnapshot::from_json(&body)
    }
}

/// The request URL carries the API key; keep it out of error text.
fn network_error(err: reqwest::Error) -> FetchError {
    FetchError::Network(err.without_url())
}
