//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees.
///
/// Latitudes grow northward, longitudes eastward in the signed
/// (-180, 180] convention. `north` must be strictly greater than `south`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its edges.
    pub fn new(north: f64, south: f64, west: f64, east: f64) -> Result<Self, BoundingBoxError> {
        if north <= south {
            return Err(BoundingBoxError::InvertedLatitudes { north, south });
        }
        Ok(Self {
            north,
            south,
            west,
            east,
        })
    }

    /// Height of the bounding box in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Width of the bounding box in degrees.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }
}

/// Normalize a stored longitude to signed degrees.
///
/// Forecast files store longitudes in [0, 360); values from 180 up wrap
/// to the negative half so that comparisons against bbox edges work on a
/// single flat axis.
pub fn normalize_longitude(lon: f64) -> f64 {
    if lon < 180.0 {
        lon
    } else {
        lon - 360.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoundingBoxError {
    #[error("north edge ({north}) must be greater than south edge ({south})")]
    InvertedLatitudes { north: f64, south: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_inverted_latitudes() {
        assert!(BoundingBox::new(10.0, 20.0, 0.0, 5.0).is_err());
        assert!(BoundingBox::new(20.0, 20.0, 0.0, 5.0).is_err());
        assert!(BoundingBox::new(20.0, 10.0, 0.0, 5.0).is_ok());
    }

    #[test]
    fn test_contains_point() {
        let bbox = BoundingBox::new(60.0, 0.0, -100.0, 20.0).unwrap();
        assert!(bbox.contains_point(0.0, 30.0));
        assert!(bbox.contains_point(-100.0, 0.0));
        assert!(!bbox.contains_point(25.0, 30.0));
        assert!(!bbox.contains_point(0.0, 61.0));
    }

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(25.0), 25.0);
        assert_eq!(normalize_longitude(179.95), 179.95);
        assert_eq!(normalize_longitude(180.0), -180.0);
        assert!((normalize_longitude(335.05) + 24.95).abs() < 1e-9);
        assert!((normalize_longitude(359.95) + 0.05).abs() < 1e-9);
    }
}
