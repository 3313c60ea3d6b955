//! Error types for exposure estimation.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while accumulating exposure.
#[derive(Error, Debug)]
pub enum ExposureError {
    #[error("Exactly one air-intake unit must be supplied (litres or cubic metres per minute)")]
    Configuration,

    #[error("Exposure window ends ({end}) before it starts ({start})")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error(
        "Exposure window [{start}, {end}) falls outside forecast coverage [{coverage_start}, {coverage_end})"
    )]
    Coverage {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        coverage_start: DateTime<Utc>,
        coverage_end: DateTime<Utc>,
    },

    #[error("Forecast table contains no sampled locations")]
    NoLocations,
}
