//! Error types for the forecast-grid crate.

use thiserror::Error;

/// Errors that can occur while reading or subsetting a forecast grid.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Unknown lead time: {0}h")]
    UnknownLeadTime(u32),

    #[error("Bounding box selects no grid points")]
    NoData,

    #[error("Axis mismatch: {0}")]
    AxisMismatch(String),

    #[error("Missing required metadata: {0}")]
    MissingMetadata(String),

    #[error("Failed to read NetCDF data: {0}")]
    Netcdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
