use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// A city name that is already trimmed and known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityName(String);

impl CityName {
    pub fn new(raw: &str) -> Result<Self, FetchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FetchError::EmptyCity);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for CityName {
    type Error = FetchError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for CityName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Latitude/longitude pair, passed to the provider exactly as received.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(CityName),
    Coordinates(Coordinates),
}

impl std::fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherQuery::City(name) => write!(f, "city '{name}'"),
            WeatherQuery::Coordinates(c) => write!(f, "({}, {})", c.latitude, c.longitude),
        }
    }
}

/// One successful current-weather reading.
///
/// Only ever built by deserializing a full provider payload; any missing or
/// mistyped field rejects the whole document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "OwCurrentResponse")]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
    pub wind_deg: u16,
    pub condition_id: i64,
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub sunrise: i64,
    pub sunset: i64,
}

impl WeatherSnapshot {
    pub fn from_json(body: &str) -> Result<Self, FetchError> {
        Ok(serde_json::from_str(body)?)
    }

    /// "City, CC"
    pub fn location_label(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }

    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@4x.png", self.icon)
    }

    pub fn sunrise_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sunrise, 0)
    }

    pub fn sunset_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sunset, 0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("humidity {0} is outside 0..=100")]
    Humidity(u32),
    #[error("wind direction {0} is outside 0..=359")]
    WindDirection(u32),
    #[error("payload has an empty `weather` list")]
    NoCondition,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: u32,
    humidity: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: i64,
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: u32,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

impl TryFrom<OwCurrentResponse> for WeatherSnapshot {
    type Error = SnapshotError;

    fn try_from(raw: OwCurrentResponse) -> Result<Self, Self::Error> {
        let humidity_pct = u8::try_from(raw.main.humidity)
            .ok()
            .filter(|h| *h <= 100)
            .ok_or(SnapshotError::Humidity(raw.main.humidity))?;

        let wind_deg = u16::try_from(raw.wind.deg)
            .ok()
            .filter(|d| *d < 360)
            .ok_or(SnapshotError::WindDirection(raw.wind.deg))?;

        let primary = raw
            .weather
            .into_iter()
            .next()
            .ok_or(SnapshotError::NoCondition)?;

        Ok(WeatherSnapshot {
            city: raw.name,
            country: raw.sys.country,
            temperature_c: raw.main.temp,
            feels_like_c: raw.main.feels_like,
            temp_min_c: raw.main.temp_min,
            temp_max_c: raw.main.temp_max,
            humidity_pct,
            pressure_hpa: raw.main.pressure,
            wind_speed_mps: raw.wind.speed,
            wind_deg,
            condition_id: primary.id,
            condition: primary.main,
            description: primary.description,
            icon: primary.icon,
            sunrise: raw.sys.sunrise,
            sunset: raw.sys.sunset,
        })
    }
}
