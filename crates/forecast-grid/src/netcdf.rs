//! NetCDF-backed raw dataset (CAMS European air-quality forecasts).
//!
//! CAMS ensemble files carry `longitude`, `latitude`, `level` and `time`
//! axes plus one concentration variable per pollutant, and encode the
//! forecast reference time in the global `FORECAST` attribute, e.g.
//! `"Europe, 20250510+[0H_96H]"`.

use chrono::{DateTime, NaiveDate, Utc};
use std::path::Path;
use tracing::info;

use crate::dataset::RawDataset;
use crate::error::{GridError, Result};

/// Model name recorded for CAMS ensemble output.
const DEFAULT_MODEL: &str = "ENSEMBLE";

/// A forecast dataset read from a NetCDF file.
///
/// Coordinate axes and metadata are read eagerly at open; value slabs are
/// read on demand so the full cross-product never has to sit in memory.
pub struct NetcdfDataset {
    file: netcdf::File,
    model: String,
    reference_time: DateTime<Utc>,
    longitudes: Vec<f64>,
    latitudes: Vec<f64>,
    levels: Vec<f64>,
    lead_times: Vec<u32>,
}

impl NetcdfDataset {
    /// Open a CAMS forecast file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = netcdf::open(path)
            .map_err(|e| GridError::Netcdf(format!("{}: {}", path.display(), e)))?;

        let longitudes = axis_values(&file, "longitude")?;
        let latitudes = axis_values(&file, "latitude")?;
        let levels = axis_values(&file, "level")?;

        let time_units = variable_units(&file, "time");
        let raw_times = axis_values(&file, "time")?;
        let lead_times = decode_lead_hours(&raw_times, time_units.as_deref());

        let forecast_attr = global_string_attribute(&file, "FORECAST")?
            .ok_or_else(|| GridError::MissingMetadata("FORECAST attribute".to_string()))?;
        let reference_time = parse_reference_time(&forecast_attr)?;

        info!(
            path = %path.display(),
            lons = longitudes.len(),
            lats = latitudes.len(),
            levels = levels.len(),
            lead_times = lead_times.len(),
            reference_time = %reference_time,
            "Opened forecast dataset"
        );

        Ok(Self {
            file,
            model: DEFAULT_MODEL.to_string(),
            reference_time,
            longitudes,
            latitudes,
            levels,
            lead_times,
        })
    }

    /// Override the recorded model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl RawDataset for NetcdfDataset {
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
        self.file.variable(field).is_some()
    }

    fn slab(&self, field: &str, lead_idx: usize, level_idx: usize) -> Result<Vec<f64>> {
        if lead_idx >= self.lead_times.len() || level_idx >= self.levels.len() {
            return Err(GridError::AxisMismatch(format!(
                "slab index ({lead_idx}, {level_idx}) outside axes"
            )));
        }
        let var = self
            .file
            .variable(field)
            .ok_or_else(|| GridError::UnknownVariable(field.to_string()))?;
        var.get_values::<f64, _>((lead_idx, level_idx, .., ..))
            .map_err(|e| GridError::Netcdf(format!("reading {field}: {e}")))
    }

    fn value_at(
        &self,
        field: &str,
        lead_idx: usize,
        level_idx: usize,
        lat_idx: usize,
        lon_idx: usize,
    ) -> Result<f64> {
        let var = self
            .file
            .variable(field)
            .ok_or_else(|| GridError::UnknownVariable(field.to_string()))?;
        var.get_value::<f64, _>((lead_idx, level_idx, lat_idx, lon_idx))
            .map_err(|e| GridError::Netcdf(format!("reading {field}: {e}")))
    }
}

/// Read a 1-D coordinate variable.
fn axis_values(file: &netcdf::File, name: &str) -> Result<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| GridError::MissingMetadata(format!("{name} axis")))?;
    var.get_values::<f64, _>(..)
        .map_err(|e| GridError::Netcdf(format!("reading {name} axis: {e}")))
}

/// Read the `units` attribute of a variable, if present.
fn variable_units(file: &netcdf::File, name: &str) -> Option<String> {
    let var = file.variable(name)?;
    let attr = var.attribute("units")?;
    match attr.value() {
        Ok(netcdf::AttributeValue::Str(s)) => Some(s),
        _ => None,
    }
}

/// Read a global string attribute, if present.
fn global_string_attribute(file: &netcdf::File, name: &str) -> Result<Option<String>> {
    match file.attribute(name) {
        Some(attr) => match attr.value() {
            Ok(netcdf::AttributeValue::Str(s)) => Ok(Some(s)),
            Ok(_) => Err(GridError::MissingMetadata(format!(
                "{name} attribute is not a string"
            ))),
            Err(e) => Err(GridError::Netcdf(format!("reading {name}: {e}"))),
        },
        None => Ok(None),
    }
}

/// Convert raw time-axis values to lead-time hours.
///
/// CAMS files declare hour offsets; files rewritten through xarray carry
/// timedelta values in nanoseconds instead.
fn decode_lead_hours(raw: &[f64], units: Option<&str>) -> Vec<u32> {
    const NANOS_PER_HOUR: f64 = 3_600_000_000_000.0;
    match units {
        Some(u) if u.to_ascii_lowercase().contains("hour") => {
            raw.iter().map(|&v| v.round() as u32).collect()
        }
        _ => raw
            .iter()
            .map(|&v| (v / NANOS_PER_HOUR).round() as u32)
            .collect(),
    }
}

/// Extract the reference time from a `FORECAST` attribute value of the form
/// `"Europe, 20250510+[0H_96H]"`.
fn parse_reference_time(forecast: &str) -> Result<DateTime<Utc>> {
    let date_part = forecast
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.split('+').next())
        .ok_or_else(|| {
            GridError::MissingMetadata(format!("unparseable FORECAST attribute: {forecast}"))
        })?;
    let date = NaiveDate::parse_from_str(date_part, "%Y%m%d").map_err(|_| {
        GridError::MissingMetadata(format!("unparseable FORECAST date: {date_part}"))
    })?;
    Ok(DateTime::from_naive_utc_and_offset(
        date.and_time(chrono::NaiveTime::MIN),
        Utc,
    ))
}
