//! Error types for the forecast-store crate.

use thiserror::Error;

/// Errors that can occur while persisting forecast records.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Conflicting record already stored under hash {hash}")]
    IngestionConflict { hash: String },

    #[error("Failed to read source grid: {0}")]
    Grid(#[from] forecast_grid::GridError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
