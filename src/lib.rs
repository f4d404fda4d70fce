//! tour-planner core
//!
//! Orders geographic stops into a short driving route: nearest-neighbor
//! construction followed by 2-opt refinement over great-circle distance,
//! with pluggable geocoding and leg-scoring backends.

pub mod traits;
pub mod stop;
pub mod solver;
pub mod osrm;
pub mod nominatim;
pub mod haversine;
