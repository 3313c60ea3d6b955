//! Raw forecast grid access and its two in-process consumers.
//!
//! A raw dataset is a dense (lead time x level x latitude x longitude)
//! array of pollutant concentrations plus its coordinate axes and a
//! reference time. This crate exposes that shape behind the [`RawDataset`]
//! trait and derives two products from it:
//!
//! - [`CellCollection`]: one axis-aligned square polygon per grid point,
//!   for spatial rendering (GeoJSON-shaped).
//! - [`ForecastTable`]: the grid flattened into one row per cell and lead
//!   time, optionally cropped to a bounding box.
//!
//! Geometry features and table rows are joined by [`aq_common::CellId`].

pub mod cells;
pub mod dataset;
mod error;
pub mod netcdf;
pub mod table;

pub use cells::{CellCollection, CellFeature, CellGeometry};
pub use dataset::{InMemoryDataset, RawDataset};
pub use error::{GridError, Result};
pub use netcdf::NetcdfDataset;
pub use table::{ForecastRow, ForecastTable};
