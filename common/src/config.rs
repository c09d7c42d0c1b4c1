use serde::Deserialize;
use std::{error::Error, fs};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CommonConfig {
    pub project_name: String,
    /// Base URL of the hosted document store REST API.
    pub store_base_url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub locality_language: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PaymentConfig {
    pub key_id: String,
    pub currency: String,
    pub display_name: String,
    /// Externally hosted checkout script, loaded lazily once per process.
    pub script_url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServerConfig {
    pub server_address: String,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub common: CommonConfig,
    pub geocoder: GeocoderConfig,
    pub payment: PaymentConfig,
    pub server: ServerConfig,
}

impl Config {
    pub fn load(config_path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let contents = fs::read_to_string(config_path)?;
        let config = serde_yml::from_str(&contents)?;

        Ok(config)
    }
}
