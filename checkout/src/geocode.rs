use crate::model::GeoPoint;
use async_trait::async_trait;
use common::config::GeocoderConfig;
use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing::debug;
use url::Url;

/// Best-effort address for a coordinate pair. Any field may come back empty
/// when the geocoding service has no data for it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedPlace {
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub street: String,
}

/// Translates a coordinate pair into a human-readable address.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse(&self, point: GeoPoint) -> Result<ResolvedPlace, Box<dyn Error + Send + Sync>>;
}

#[derive(Debug, Deserialize, Default)]
struct GeocodeResponse {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    locality: Option<String>,
    #[serde(rename = "principalSubdivision", default)]
    principal_subdivision: Option<String>,
    #[serde(default)]
    postcode: Option<String>,
    #[serde(default)]
    street: Option<String>,
}

impl From<GeocodeResponse> for ResolvedPlace {
    fn from(response: GeocodeResponse) -> Self {
        ResolvedPlace {
            // The service reports either a city or a coarser locality.
            city: response
                .city
                .filter(|c| !c.is_empty())
                .or(response.locality)
                .unwrap_or_default(),
            state: response.principal_subdivision.unwrap_or_default(),
            pincode: response.postcode.unwrap_or_default(),
            street: response.street.unwrap_or_default(),
        }
    }
}

/// HTTP client for the external reverse-geocoding service.
pub struct ReverseGeocodeClient {
    client: reqwest::Client,
    endpoint: Url,
    locality_language: String,
}

impl ReverseGeocodeClient {
    pub fn new(config: &GeocoderConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: Url::parse(&config.endpoint)?,
            locality_language: config.locality_language.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for ReverseGeocodeClient {
    async fn reverse(&self, point: GeoPoint) -> Result<ResolvedPlace, Box<dyn Error + Send + Sync>> {
        debug!("Reverse geocoding ({}, {})", point.lat, point.lng);
        let response: GeocodeResponse = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("latitude", point.lat.to_string()),
                ("longitude", point.lng.to_string()),
                ("localityLanguage", self.locality_language.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.into())
    }
}
