//! Common types and utilities shared across the air-quality forecast services.

pub mod bbox;
pub mod cell;
pub mod coord;
pub mod pollutant;
pub mod time;

pub use bbox::{BoundingBox, BoundingBoxError};
pub use cell::CellId;
pub use coord::Coordinate;
pub use pollutant::{pollutant_for_field, Pollutant};
pub use time::ValidTime;
