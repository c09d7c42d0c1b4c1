use crate::model::GeoPoint;
use async_trait::async_trait;
use std::error::Error;

/// Platform service yielding a single best-effort current coordinate.
///
/// Failure is surfaced to the caller immediately; there is no retry and no
/// escalation beyond the user-visible message.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<GeoPoint, Box<dyn Error + Send + Sync>>;
}

/// Provider for environments without a device location service. Every
/// request fails, which the flow reports as location unavailability.
pub struct UnsupportedLocationProvider;

#[async_trait]
impl LocationProvider for UnsupportedLocationProvider {
    async fn current_position(&self) -> Result<GeoPoint, Box<dyn Error + Send + Sync>> {
        Err("Geolocation not supported".into())
    }
}
