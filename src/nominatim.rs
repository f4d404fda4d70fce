//! Nominatim HTTP adapter for coordinate resolution.

use serde::Deserialize;
use tracing::warn;

use crate::stop::Coordinate;
use crate::traits::CoordinateResolver;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Sent with every request; the public Nominatim instance rejects
    /// clients without an identifying user agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("tour-planner/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl CoordinateResolver for NominatimClient {
    fn resolve(&self, query: &str) -> Option<Coordinate> {
        let url = format!("{}/search", self.config.base_url);

        let response = self
            .client
            .get(url)
            .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<NominatimPlace>>());

        let place = match response {
            Ok(places) => places.into_iter().next()?,
            Err(err) => {
                warn!(error = %err, query, "geocoding request failed");
                return None;
            }
        };

        let latitude = place.lat.parse::<f64>().ok()?;
        let longitude = place.lon.parse::<f64>().ok()?;

        match Coordinate::new(latitude, longitude) {
            Ok(coordinate) => Some(coordinate),
            Err(err) => {
                warn!(error = %err, query, "geocoder returned an out-of-range coordinate");
                None
            }
        }
    }
}

/// Nominatim serializes coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}
