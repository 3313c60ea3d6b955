//! Raw dataset abstraction.
//!
//! All consumers (cell geometry, tabular extraction, bulk persistence) read
//! the same shape: named coordinate axes plus a dense scalar field per
//! pollutant. Binding that shape to a trait keeps the dataset source
//! swappable: production reads NetCDF files, tests build grids in memory.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::error::{GridError, Result};

/// A gridded forecast dataset.
///
/// Value arrays are indexed `(lead time, level, latitude, longitude)` with
/// longitude varying fastest. Axes are as stored in the source: longitudes
/// may be in [0, 360) and latitudes ordered north to south.
pub trait RawDataset {
    /// Forecast model name (e.g. "ENSEMBLE").
    fn model(&self) -> &str;

    /// Reference/base time of the forecast run.
    fn reference_time(&self) -> DateTime<Utc>;

    /// Longitude axis, as stored.
    fn longitudes(&self) -> &[f64];

    /// Latitude axis, as stored (north to south for CAMS data).
    fn latitudes(&self) -> &[f64];

    /// Vertical level axis.
    fn levels(&self) -> &[f64];

    /// Lead-time offsets from the reference time, in hours.
    fn lead_times(&self) -> &[u32];

    /// Whether the dataset carries the given scalar field.
    fn has_field(&self, field: &str) -> bool;

    /// Read the 2-D (latitude x longitude) slab of one field at one lead
    /// time and level, latitude-major.
    fn slab(&self, field: &str, lead_idx: usize, level_idx: usize) -> Result<Vec<f64>>;

    /// Read a single scalar value.
    fn value_at(
        &self,
        field: &str,
        lead_idx: usize,
        level_idx: usize,
        lat_idx: usize,
        lon_idx: usize,
    ) -> Result<f64>;
}

/// An in-memory dataset, used as a test double and for dry runs.
///
/// Fields are stored as dense 4-D arrays flattened in
/// `(lead time, level, latitude, longitude)` order.
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    model: String,
    reference_time: DateTime<Utc>,
    longitudes: Vec<f64>,
    latitudes: Vec<f64>,
    levels: Vec<f64>,
    lead_times: Vec<u32>,
    fields: HashMap<String, Vec<f64>>,
}

impl InMemoryDataset {
    pub fn new(
        model: impl Into<String>,
        reference_time: DateTime<Utc>,
        longitudes: Vec<f64>,
        latitudes: Vec<f64>,
        levels: Vec<f64>,
        lead_times: Vec<u32>,
    ) -> Self {
        Self {
            model: model.into(),
            reference_time,
            longitudes,
            latitudes,
            levels,
            lead_times,
            fields: HashMap::new(),
        }
    }

    /// Attach a scalar field. The value count must equal the product of the
    /// four axis lengths.
    pub fn with_field(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let expected = self.lead_times.len()
            * self.levels.len()
            * self.latitudes.len()
            * self.longitudes.len();
        if values.len() != expected {
            return Err(GridError::AxisMismatch(format!(
                "field has {} values, axes imply {}",
                values.len(),
                expected
            )));
        }
        self.fields.insert(name.into(), values);
        Ok(self)
    }

    fn field(&self, name: &str) -> Result<&[f64]> {
        self.fields
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| GridError::UnknownVariable(name.to_string()))
    }

    fn flat_index(&self, lead_idx: usize, level_idx: usize, lat_idx: usize, lon_idx: usize) -> usize {
        let nlon = self.longitudes.len();
        let nlat = self.latitudes.len();
        let nlevel = self.levels.len();
        ((lead_idx * nlevel + level_idx) * nlat + lat_idx) * nlon + lon_idx
    }
}

impl RawDataset for InMemoryDataset {
    fn model(&self) -> &str {
        &self.model
    }

    fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    fn levels(&self) -> &[f64] {
        &self.levels
    }

    fn lead_times(&self) -> &[u32] {
        &self.lead_times
    }

    fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    fn slab(&self, field: &str, lead_idx: usize, level_idx: usize) -> Result<Vec<f64>> {
        if lead_idx >= self.lead_times.len() || level_idx >= self.levels.len() {
            return Err(GridError::AxisMismatch(format!(
                "slab index ({lead_idx}, {level_idx}) outside axes"
            )));
        }
        let values = self.field(field)?;
        let start = self.flat_index(lead_idx, level_idx, 0, 0);
        let len = self.latitudes.len() * self.longitudes.len();
        Ok(values[start..start + len].to_vec())
    }

    fn value_at(
        &self,
        field: &str,
        lead_idx: usize,
        level_idx: usize,
        lat_idx: usize,
        lon_idx: usize,
    ) -> Result<f64> {
        if lead_idx >= self.lead_times.len()
            || level_idx >= self.levels.len()
            || lat_idx >= self.latitudes.len()
            || lon_idx >= self.longitudes.len()
        {
            return Err(GridError::AxisMismatch(format!(
                "value index ({lead_idx}, {level_idx}, {lat_idx}, {lon_idx}) outside axes"
            )));
        }
        let values = self.field(field)?;
        Ok(values[self.flat_index(lead_idx, level_idx, lat_idx, lon_idx)])
    }
}
