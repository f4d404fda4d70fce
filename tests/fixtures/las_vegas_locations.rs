//! Real Las Vegas / Henderson locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. Distances between these
//! points are large enough that ordering mistakes show up clearly.

use tour_planner::stop::{Coordinate, Stop, StopId};

/// A named location with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng).unwrap()
    }

    pub fn stop(&self, id: &str) -> Stop {
        Stop::new(StopId::new(id), self.name)
            .unwrap()
            .with_coordinate(self.coordinate())
    }
}

/// Strip hotels, a delivery round's worth of them.
pub const STRIP_STOPS: &[Location] = &[
    Location::new("Wynn Las Vegas", 36.1263781, -115.1658180),
    Location::new("MGM Grand", 36.1023654, -115.1688720),
    Location::new("Bellagio", 36.1126, -115.1767),
    Location::new("Caesars Palace", 36.1162, -115.1745),
    Location::new("Brooklyn Bowl", 36.1175388, -115.1695094),
    Location::new("Spago by Wolfgang Puck", 36.1139368, -115.1741462),
    Location::new("Hard Rock Cafe", 36.1041592, -115.1722166),
    Location::new("Gordon Ramsay Steak", 36.1127744, -115.1712029),
];

/// Stops far off the Strip, to give tours some long legs.
pub const OUTLYING_STOPS: &[Location] = &[
    Location::new("Longhorn Casino", 36.1070664, -115.0591256),
    Location::new("Henderson Depot", 36.0397222, -114.9819444),
];
