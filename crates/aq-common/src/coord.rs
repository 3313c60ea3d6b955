//! Point coordinates on the flat lat/lon plane.

use serde::{Deserialize, Serialize};

/// A point location in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Euclidean distance to another point, treating degrees as a flat
    /// plane. Good enough for picking the nearest cell of a regular grid;
    /// this is not a great-circle distance.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let dx = self.lon - other.lon;
        let dy = self.lat - other.lat;
        (dx * dx + dy * dy).sqrt()
    }
}
