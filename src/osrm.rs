//! OSRM HTTP adapter for leg scoring.

use serde::Deserialize;
use tracing::warn;

use crate::stop::Coordinate;
use crate::traits::{Leg, LegScorer};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl LegScorer for OsrmClient {
    fn score(&self, from: Coordinate, to: Coordinate) -> Option<Leg> {
        let url = format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=false",
            self.config.base_url,
            self.config.profile,
            from.longitude(),
            from.latitude(),
            to.longitude(),
            to.latitude(),
        );

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>());

        match response {
            Ok(body) => body.routes.into_iter().next().map(|route| Leg {
                distance_m: route.distance,
                duration_s: route.duration,
            }),
            Err(err) => {
                warn!(error = %err, "OSRM route request failed");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
}
