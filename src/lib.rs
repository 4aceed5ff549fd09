//! Damped-trend forecasting and growth scoring for annual indicator panels.
//!
//! The core (`panel`, `forecast`, `growth`, `summary`, `math`) is pure in-memory table
//! transformation. `pipeline`, `io` and `cli` wire it into a runnable tool.

pub mod cli;
pub mod ctx;
pub mod error;
pub mod forecast;
pub mod growth;
pub mod io;
pub mod math;
pub mod panel;
pub mod pipeline;
pub mod schema;
pub mod summary;

pub use error::{GrowthError, Result};
