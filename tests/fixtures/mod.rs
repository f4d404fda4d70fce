//! Test fixtures for tour-planner.
//!
//! Real Las Vegas locations (from OpenStreetMap) for realistic
//! end-to-end ordering scenarios.

pub mod las_vegas_locations;

pub use las_vegas_locations::*;
