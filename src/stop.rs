//! Stop and tour data model.
//!
//! Coordinates are validated at construction and always carry both
//! components; a stop either has a full latitude/longitude pair or none.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A geographic coordinate in decimal degrees.
///
/// Latitude is bounded to [-90, 90] and longitude to [-180, 180];
/// out-of-range values cannot be constructed. Deserialization goes
/// through the same validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("coordinate out of range: ({latitude}, {longitude})")]
pub struct InvalidCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Unique identifier for a stop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StopId(String);

impl StopId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StopError {
    #[error("stop name must not be empty")]
    EmptyName,
}

/// A named location to visit, possibly not yet placed on the map.
///
/// The coordinate is filled in by geocoding resolution; everything else
/// is set at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    id: StopId,
    name: String,
    address: Option<String>,
    coordinate: Option<Coordinate>,
}

impl Stop {
    /// Creates a stop with no address and no coordinate.
    pub fn new(id: StopId, name: impl Into<String>) -> Result<Self, StopError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StopError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            address: None,
            coordinate: None,
        })
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    pub fn id(&self) -> &StopId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    /// Query text for a geocoding resolver: the address when present,
    /// otherwise the display name.
    pub fn query(&self) -> &str {
        self.address.as_deref().unwrap_or(&self.name)
    }

    /// Fills the coordinate after external resolution.
    pub fn resolve(&mut self, coordinate: Coordinate) {
        self.coordinate = Some(coordinate);
    }

    /// Splits into a resolved stop, or hands the stop back unchanged
    /// when no coordinate is known.
    pub fn into_resolved(self) -> Result<ResolvedStop, Stop> {
        match self.coordinate {
            Some(coordinate) => Ok(ResolvedStop {
                id: self.id,
                name: self.name,
                address: self.address,
                coordinate,
            }),
            None => Err(self),
        }
    }
}

/// A stop whose coordinate is known. Tours only contain these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStop {
    id: StopId,
    name: String,
    address: Option<String>,
    coordinate: Coordinate,
}

impl ResolvedStop {
    pub fn id(&self) -> &StopId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

/// An ordered, duplicate-free sequence of resolved stops.
///
/// Immutable once returned by the optimizer; a new optimization run
/// produces a new tour rather than mutating an old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    stops: Vec<ResolvedStop>,
}

impl Tour {
    pub(crate) fn new(stops: Vec<ResolvedStop>) -> Self {
        Self { stops }
    }

    pub fn stops(&self) -> &[ResolvedStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn into_stops(self) -> Vec<ResolvedStop> {
        self.stops
    }
}
