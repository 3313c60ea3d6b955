//! Grid-cell polygon construction.
//!
//! Each raw sample point becomes one axis-aligned square cell centered on
//! it, sized to the 0.1-degree spacing of the CAMS European grid. The full
//! set is a GeoJSON-shaped FeatureCollection whose feature ids join against
//! forecast table rows.

use serde::{Deserialize, Serialize};

use aq_common::{bbox::normalize_longitude, CellId};

use crate::dataset::RawDataset;

/// Half of a cell's edge length, in degrees.
const HALF_CELL: f64 = 0.05;

/// Round a coordinate to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A FeatureCollection of grid cells.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// One feature per grid point.
    pub features: Vec<CellFeature>,
}

/// One square grid cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellFeature {
    /// Canonical centroid key, shared with forecast table rows.
    pub id: String,

    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    pub geometry: CellGeometry,
}

/// Square polygon geometry around one sample point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellGeometry {
    /// Type identifier (always "Polygon").
    #[serde(rename = "type")]
    pub type_: String,

    /// A single ring of corners in NE, SE, SW, NW order.
    pub coordinates: Vec<Vec<[f64; 2]>>,

    /// Cell centroid, rounded to two decimals.
    pub centroid: [f64; 2],
}

impl CellCollection {
    /// Build one cell per (longitude, latitude) pair of the given axes.
    ///
    /// Pairs are generated longitude-major: every longitude against every
    /// latitude. Stored longitudes in [0, 360) are normalized to signed
    /// degrees first so that ids line up with table rows. Empty axes give
    /// an empty collection.
    pub fn from_axes(longitudes: &[f64], latitudes: &[f64]) -> Self {
        let mut features = Vec::with_capacity(longitudes.len() * latitudes.len());
        for &raw_lon in longitudes {
            let lon = normalize_longitude(raw_lon);
            for &lat in latitudes {
                features.push(CellFeature::square(lon, lat));
            }
        }
        Self {
            type_: "FeatureCollection".to_string(),
            features,
        }
    }

    /// Build the cell collection for a dataset's axes.
    pub fn from_dataset(dataset: &dyn RawDataset) -> Self {
        Self::from_axes(dataset.longitudes(), dataset.latitudes())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl CellFeature {
    /// Build the square cell centered on a sample point.
    fn square(lon: f64, lat: f64) -> Self {
        let id = CellId::from_degrees(lon, lat);
        let north_east = [round2(lon + HALF_CELL), round2(lat + HALF_CELL)];
        let south_east = [round2(lon + HALF_CELL), round2(lat - HALF_CELL)];
        let south_west = [round2(lon - HALF_CELL), round2(lat - HALF_CELL)];
        let north_west = [round2(lon - HALF_CELL), round2(lat + HALF_CELL)];

        Self {
            id: id.to_string(),
            type_: "Feature".to_string(),
            geometry: CellGeometry {
                type_: "Polygon".to_string(),
                coordinates: vec![vec![north_east, south_east, south_west, north_west]],
                centroid: [id.lon(), id.lat()],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_two_by_two_axes_give_four_cells() {
        let cells = CellCollection::from_axes(&[10.25, 10.35], &[60.55, 60.45]);
        assert_eq!(cells.type_, "FeatureCollection");
        assert_eq!(cells.len(), 4);

        let ids: HashSet<&str> = cells.features.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids.len(), 4);

        for feature in &cells.features {
            assert_eq!(feature.type_, "Feature");
            assert_eq!(feature.geometry.type_, "Polygon");
            let ring = &feature.geometry.coordinates[0];
            assert_eq!(ring.len(), 4);
            let [clon, clat] = feature.geometry.centroid;
            // NE, SE, SW, NW offsets from the centroid
            assert_eq!(ring[0], [round2(clon + 0.05), round2(clat + 0.05)]);
            assert_eq!(ring[1], [round2(clon + 0.05), round2(clat - 0.05)]);
            assert_eq!(ring[2], [round2(clon - 0.05), round2(clat - 0.05)]);
            assert_eq!(ring[3], [round2(clon - 0.05), round2(clat + 0.05)]);
        }
    }

    #[test]
    fn test_order_is_longitude_major() {
        let cells = CellCollection::from_axes(&[0.0, 1.0], &[10.0, 9.0]);
        let ids: Vec<&str> = cells.features.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["[0.0, 10.0]", "[0.0, 9.0]", "[1.0, 10.0]", "[1.0, 9.0]"]);
    }

    #[test]
    fn test_wrapped_longitudes_are_normalized() {
        let cells = CellCollection::from_axes(&[340.15], &[60.25]);
        assert_eq!(cells.features[0].id, "[-19.85, 60.25]");
        assert_eq!(cells.features[0].geometry.centroid, [-19.85, 60.25]);
    }

    #[test]
    fn test_empty_axis_gives_empty_collection() {
        assert!(CellCollection::from_axes(&[], &[60.0]).is_empty());
        assert!(CellCollection::from_axes(&[10.0], &[]).is_empty());
    }

    #[test]
    fn test_serializes_to_geojson_shape() {
        let cells = CellCollection::from_axes(&[10.25], &[60.45]);
        let json = serde_json::to_value(&cells).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["type"], "Feature");
        assert_eq!(json["features"][0]["id"], "[10.25, 60.45]");
        assert_eq!(json["features"][0]["geometry"]["type"], "Polygon");
        assert_eq!(
            json["features"][0]["geometry"]["coordinates"][0][0][0]
                .as_f64()
                .unwrap(),
            10.3
        );
    }
}
