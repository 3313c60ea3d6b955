//! Canonical grid-cell identifiers.
//!
//! Grid-cell geometry and forecast value rows are produced by different
//! components and joined back together by cell id. The id is a typed
//! centi-degree pair rather than a formatted string, so both producers go
//! through the same constructor and the join cannot drift on formatting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one grid cell, keyed by its centroid.
///
/// Coordinates are stored as integer hundredths of a degree. The rendered
/// form is the canonical `"[lon, lat]"` string used as the GeoJSON feature
/// id and the forecast table row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId {
    lon_centi: i32,
    lat_centi: i32,
}

impl CellId {
    /// Build a cell id from raw degree coordinates, rounding the centroid
    /// to two decimal places.
    pub fn from_degrees(lon: f64, lat: f64) -> Self {
        Self {
            lon_centi: (lon * 100.0).round() as i32,
            lat_centi: (lat * 100.0).round() as i32,
        }
    }

    /// Centroid longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon_centi as f64 / 100.0
    }

    /// Centroid latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat_centi as f64 / 100.0
    }
}

/// Render a rounded coordinate with at least one decimal digit, so that
/// whole degrees come out as "60.0" rather than "60".
fn fmt_coord(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value == value.trunc() {
        write!(f, "{:.1}", value)
    } else {
        write!(f, "{}", value)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        fmt_coord(f, self.lon())?;
        write!(f, ", ")?;
        fmt_coord(f, self.lat())?;
        write!(f, "]")
    }
}
