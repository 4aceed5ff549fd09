//! Per-entity damped-trend forecasting and its panel-level aggregation.

use crate::error::{GrowthError, Result};

pub mod aggregate;
pub mod model;

pub use aggregate::{ForecastBatch, forecast_panel, forecast_series};
pub use model::{FittedModel, SmoothingParams, fit, fit_and_forecast};

pub const DEFAULT_HORIZON: usize = 12;
pub const DEFAULT_MAX_ITER: usize = 2000;
pub const MAX_HORIZON: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastOptions {
    pub horizon: usize,
    pub damped: bool,
    /// Upper bound on optimizer iterations per entity.
    pub max_iter: usize,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            damped: true,
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

impl ForecastOptions {
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 || self.horizon > MAX_HORIZON {
            return Err(GrowthError::InvalidConfig {
                name: "horizon",
                reason: format!("must be between 1 and {}", MAX_HORIZON),
            });
        }
        if self.max_iter == 0 {
            return Err(GrowthError::InvalidConfig {
                name: "max_iter",
                reason: "must be a positive integer".to_string(),
            });
        }
        Ok(())
    }
}

/// Projected values for one entity, starting the year after its last observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub entity: String,
    pub first_year: i32,
    pub values: Vec<f64>,
    pub params: SmoothingParams,
}

impl ForecastResult {
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.values.len()).map(move |i| self.first_year + i as i32)
    }

    pub fn points(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.years().zip(self.values.iter().copied())
    }

    pub fn horizon(&self) -> usize {
        self.values.len()
    }
}
