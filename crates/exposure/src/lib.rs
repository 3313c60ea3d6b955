//! Time-integrated personal exposure estimation.
//!
//! Given a multi-lead-time forecast table and a query point, selects the
//! nearest sampled location and integrates its concentration over a time
//! window under a piecewise-constant model: exposed mass =
//! sum over segments of concentration x overlap minutes x air intake
//! (m³/minute).

mod accumulator;
mod error;

pub use accumulator::{accumulate, AirIntake};
pub use error::ExposureError;
