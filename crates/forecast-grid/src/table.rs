//! Tabular extraction of the raw forecast grid.
//!
//! Flattens the (latitude x longitude) slab of one variable at one or more
//! lead times into uniform rows, optionally cropped to a bounding box by
//! coordinate-index search.

use chrono::{DateTime, Utc};
use tracing::debug;

use aq_common::{bbox::normalize_longitude, BoundingBox, CellId};

use crate::dataset::RawDataset;
use crate::error::{GridError, Result};

/// One (location, lead time) observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    /// Centroid key joining this row to its grid-cell feature.
    pub id: CellId,
    /// Concentration value.
    pub value: f64,
    /// Centroid longitude, rounded to two decimals.
    pub lon: f64,
    /// Centroid latitude, rounded to two decimals.
    pub lat: f64,
    /// Lead-time offset in hours.
    pub leadtime: u32,
}

/// An ordered table of forecast rows for one variable.
///
/// Carries the base (reference) time of the forecast run so that consumers
/// can turn lead-time offsets into timestamps.
#[derive(Debug, Clone)]
pub struct ForecastTable {
    variable: String,
    base_time: DateTime<Utc>,
    rows: Vec<ForecastRow>,
}

impl ForecastTable {
    /// Load the grid of one variable at a single lead time, at the surface
    /// level, optionally cropped to `bbox`.
    ///
    /// Rows are emitted latitude-major over the (possibly cropped) axes,
    /// matching the storage order of the slab.
    pub fn load(
        dataset: &dyn RawDataset,
        field: &str,
        leadtime: u32,
        bbox: Option<&BoundingBox>,
    ) -> Result<Self> {
        let mut table = Self {
            variable: field.to_string(),
            base_time: dataset.reference_time(),
            rows: Vec::new(),
        };
        table.append_leadtime(dataset, field, leadtime, bbox)?;
        Ok(table)
    }

    /// Load one table across several lead times.
    ///
    /// Equivalent to concatenating single-lead-time loads, then stable
    /// sorting ascending by lead time; rows within one lead time keep their
    /// per-load order.
    pub fn load_range(
        dataset: &dyn RawDataset,
        field: &str,
        leadtimes: &[u32],
        bbox: Option<&BoundingBox>,
    ) -> Result<Self> {
        let mut table = Self {
            variable: field.to_string(),
            base_time: dataset.reference_time(),
            rows: Vec::new(),
        };
        for &leadtime in leadtimes {
            table.append_leadtime(dataset, field, leadtime, bbox)?;
        }
        table.rows.sort_by_key(|row| row.leadtime);
        Ok(table)
    }

    /// Assemble a table from already-produced rows.
    pub fn from_rows(
        variable: impl Into<String>,
        base_time: DateTime<Utc>,
        rows: Vec<ForecastRow>,
    ) -> Self {
        Self {
            variable: variable.into(),
            base_time,
            rows,
        }
    }

    fn append_leadtime(
        &mut self,
        dataset: &dyn RawDataset,
        field: &str,
        leadtime: u32,
        bbox: Option<&BoundingBox>,
    ) -> Result<()> {
        if !dataset.has_field(field) {
            return Err(GridError::UnknownVariable(field.to_string()));
        }
        let lead_idx = dataset
            .lead_times()
            .iter()
            .position(|&t| t == leadtime)
            .ok_or(GridError::UnknownLeadTime(leadtime))?;

        let longitudes: Vec<f64> = dataset
            .longitudes()
            .iter()
            .copied()
            .map(normalize_longitude)
            .collect();
        let latitudes = dataset.latitudes();
        let slab = dataset.slab(field, lead_idx, 0)?;
        let nlon = longitudes.len();

        let (lon_range, lat_range) = match bbox {
            Some(bbox) => crop_indices(&longitudes, latitudes, bbox)?,
            None => {
                if longitudes.is_empty() || latitudes.is_empty() {
                    (0..0, 0..0)
                } else {
                    (0..nlon, 0..latitudes.len())
                }
            }
        };

        debug!(
            variable = field,
            leadtime = leadtime,
            lons = lon_range.len(),
            lats = lat_range.len(),
            "Flattening forecast slab"
        );

        for lat_idx in lat_range.clone() {
            for lon_idx in lon_range.clone() {
                let id = CellId::from_degrees(longitudes[lon_idx], latitudes[lat_idx]);
                self.rows.push(ForecastRow {
                    id,
                    value: slab[lat_idx * nlon + lon_idx],
                    lon: id.lon(),
                    lat: id.lat(),
                    leadtime,
                });
            }
        }
        Ok(())
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Reference time of the run the rows were loaded from.
    pub fn base_time(&self) -> DateTime<Utc> {
        self.base_time
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Find the index ranges selected by a bounding box.
///
/// The longitude axis is ascending: the range runs from the first index
/// strictly east of `west` through the last index strictly west of `east`.
/// The latitude axis is stored north to south, so the range runs from the
/// first index strictly below `north` through the last index strictly above
/// `south`. An empty selection on either axis is an error.
fn crop_indices(
    longitudes: &[f64],
    latitudes: &[f64],
    bbox: &BoundingBox,
) -> Result<(std::ops::Range<usize>, std::ops::Range<usize>)> {
    let west_idx = longitudes
        .iter()
        .position(|&lon| lon > bbox.west)
        .ok_or(GridError::NoData)?;
    let east_idx = longitudes
        .iter()
        .rposition(|&lon| lon < bbox.east)
        .ok_or(GridError::NoData)?;

    let north_idx = latitudes
        .iter()
        .position(|&lat| lat < bbox.north)
        .ok_or(GridError::NoData)?;
    let south_idx = latitudes
        .iter()
        .rposition(|&lat| lat > bbox.south)
        .ok_or(GridError::NoData)?;

    if west_idx > east_idx || north_idx > south_idx {
        return Err(GridError::NoData);
    }
    Ok((west_idx..east_idx + 1, north_idx..south_idx + 1))
}
