//! Source of "current location" coordinates.
//!
//! Permission prompts and platform geolocation live behind this trait; the
//! controller only ever sees the resulting coordinate pair.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::Coordinates;

#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied. Please use city search.")]
    PermissionDenied,
}

#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    /// `Ok(None)` means the platform has no fix to report.
    async fn current_location(&self) -> Result<Option<Coordinates>, LocationError>;
}

/// Reports a fixed, preconfigured position (or none).
#[derive(Debug, Clone, Default)]
pub struct StaticLocation {
    coordinates: Option<Coordinates>,
}

impl StaticLocation {
    pub fn new(coordinates: Option<Coordinates>) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl LocationProvider for StaticLocation {
    async fn current_location(&self) -> Result<Option<Coordinates>, LocationError> {
        Ok(self.coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_location_reports_configured_point() {
        let loc = StaticLocation::new(Some(Coordinates::new(51.5072, -0.1276)));
        let coords = loc.current_location().await.unwrap();

        assert_eq!(coords, Some(Coordinates::new(51.5072, -0.1276)));
    }

    #[tokio::test]
    async fn static_location_without_point_reports_none() {
        let loc = StaticLocation::default();
        assert_eq!(loc.current_location().await.unwrap(), None);
    }
}
