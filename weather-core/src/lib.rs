//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - The current-weather data model and its strict JSON decoding
//! - The OpenWeather HTTP provider behind a `WeatherProvider` trait
//! - A fetch controller exposing loading / success / failure state
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also be reused by other front-ends.

pub mod config;
pub mod controller;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;

pub use config::Config;
pub use controller::{FetchPhase, FetchState, StateSubscription, WeatherController};
pub use error::{FetchError, FetchErrorKind};
pub use location::{LocationError, LocationProvider, StaticLocation};
pub use model::{CityName, Coordinates, WeatherQuery, WeatherSnapshot};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
