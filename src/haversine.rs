//! Great-circle distance and a haversine-based leg scorer.
//!
//! Straight-line distance drives the ordering heuristic and stands in
//! for road metrics when no directions service is available.

use crate::stop::Coordinate;
use crate::traits::{Leg, LegScorer};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters.
///
/// Symmetric, and zero for identical coordinates. Inputs are assumed
/// validated; `Coordinate` guarantees that.
pub fn distance_m(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.latitude().to_radians();
    let lat2_rad = to.latitude().to_radians();
    let delta_lat = (to.latitude() - from.latitude()).to_radians();
    let delta_lng = (to.longitude() - from.longitude()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Haversine-based leg scorer.
///
/// Estimates travel time from straight-line distance and an assumed
/// average speed. Useful as a fallback when no directions service is
/// available; less accurate since it ignores the road network.
#[derive(Debug, Clone)]
pub struct HaversineScorer {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineScorer {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineScorer {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Convert distance in meters to travel time in seconds.
    fn meters_to_seconds(&self, meters: f64) -> f64 {
        let hours = meters / (self.speed_kmh * 1000.0);
        hours * 3600.0
    }
}

impl LegScorer for HaversineScorer {
    fn score(&self, from: Coordinate, to: Coordinate) -> Option<Leg> {
        let distance_m = distance_m(from, to);
        Some(Leg {
            distance_m,
            duration_s: self.meters_to_seconds(distance_m),
        })
    }
}
