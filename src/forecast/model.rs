//! Additive damped-trend exponential smoothing (Gardner & McKenzie, 1985).
//!
//! ```text
//! Level:    l_t = α y_t + (1 - α)(l_{t-1} + φ b_{t-1})
//! Trend:    b_t = β (l_t - l_{t-1}) + (1 - β) φ b_{t-1}
//! Forecast: ŷ_{n+h} = l_n + (φ + φ² + … + φ^h) b_n
//! ```
//!
//! α, β and φ are chosen by minimizing the in-sample one-step-ahead squared
//! error. The series is divided by its mean magnitude first so the optimizer
//! tolerances do not depend on the units of the indicator. With damping off
//! φ is pinned to 1, which is Holt's linear trend.

use crate::error::{GrowthError, Result};
use crate::forecast::{ForecastOptions, ForecastResult};
use crate::math::optim::{NelderMeadConfig, nelder_mead};
use crate::math::stats::{mean, ols_on_index};
use crate::panel::EntitySeries;

const SMOOTHING_BOUNDS: (f64, f64) = (1e-4, 0.9999);
const DAMPING_BOUNDS: (f64, f64) = (0.8, 0.98);
const START_ALPHA: f64 = 0.3;
const START_BETA: f64 = 0.1;
const START_PHI: f64 = 0.98;
/// Observations used by the regression that seeds level and trend.
const INIT_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    pub alpha: f64,
    pub beta: f64,
    pub phi: f64,
    /// In-sample mean squared one-step error on the normalized series.
    pub mse: f64,
    pub iterations: usize,
}

/// Final smoother state for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    entity: String,
    last_year: i32,
    scale: f64,
    level: f64,
    trend: f64,
    params: SmoothingParams,
}

impl FittedModel {
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn params(&self) -> &SmoothingParams {
        &self.params
    }

    pub fn forecast(&self, horizon: usize) -> ForecastResult {
        let values = (1..=horizon)
            .map(|h| (self.level + damped_sum(self.params.phi, h) * self.trend) * self.scale)
            .collect();
        ForecastResult {
            entity: self.entity.clone(),
            first_year: self.last_year + 1,
            values,
            params: self.params,
        }
    }
}

/// Fits the smoother to one series. No state is shared between calls.
pub fn fit(series: &EntitySeries, options: &ForecastOptions) -> Result<FittedModel> {
    options.validate()?;
    let n = series.len();
    if n < 2 {
        return Err(GrowthError::InsufficientHistory {
            entity: series.entity().to_string(),
            len: n,
        });
    }

    let scale = series_scale(series.values());
    let y: Vec<f64> = series.values().iter().map(|v| v / scale).collect();

    let seed = ols_on_index(&y[..n.min(INIT_WINDOW)]).ok_or_else(|| {
        GrowthError::malformed(format!(
            "series '{}' cannot seed an initial trend",
            series.entity()
        ))
    })?;
    // State just before the first observation.
    let level0 = seed.intercept - seed.slope;
    let trend0 = seed.slope;

    let config = NelderMeadConfig {
        max_iter: options.max_iter,
        ..Default::default()
    };
    let (alpha, beta, phi, iterations, converged) = if options.damped {
        let m = nelder_mead(
            |p| run_filter(&y, p[0], p[1], p[2], level0, trend0).mse,
            &[START_ALPHA, START_BETA, START_PHI],
            &[SMOOTHING_BOUNDS, SMOOTHING_BOUNDS, DAMPING_BOUNDS],
            &config,
        );
        (m.point[0], m.point[1], m.point[2], m.iterations, m.converged)
    } else {
        let m = nelder_mead(
            |p| run_filter(&y, p[0], p[1], 1.0, level0, trend0).mse,
            &[START_ALPHA, START_BETA],
            &[SMOOTHING_BOUNDS, SMOOTHING_BOUNDS],
            &config,
        );
        (m.point[0], m.point[1], 1.0, m.iterations, m.converged)
    };

    let state = run_filter(&y, alpha, beta, phi, level0, trend0);
    let finite = [alpha, beta, phi, state.mse, state.level, state.trend]
        .iter()
        .all(|v| v.is_finite());
    if !converged || !finite {
        return Err(GrowthError::NonConvergence {
            entity: series.entity().to_string(),
            iterations,
        });
    }

    Ok(FittedModel {
        entity: series.entity().to_string(),
        last_year: series.last_year(),
        scale,
        level: state.level,
        trend: state.trend,
        params: SmoothingParams {
            alpha,
            beta,
            phi,
            mse: state.mse,
            iterations,
        },
    })
}

/// Fits one entity and projects `options.horizon` years past its last observation.
pub fn fit_and_forecast(series: &EntitySeries, options: &ForecastOptions) -> Result<ForecastResult> {
    let model = fit(series, options)?;
    let result = model.forecast(options.horizon);
    if result.values.iter().any(|v| !v.is_finite()) {
        return Err(GrowthError::NonConvergence {
            entity: series.entity().to_string(),
            iterations: model.params.iterations,
        });
    }
    Ok(result)
}

struct FilterState {
    mse: f64,
    level: f64,
    trend: f64,
}

fn run_filter(y: &[f64], alpha: f64, beta: f64, phi: f64, level0: f64, trend0: f64) -> FilterState {
    let mut level = level0;
    let mut trend = trend0;
    let mut sse = 0.0;
    for &obs in y {
        let predicted = level + phi * trend;
        let err = obs - predicted;
        sse += err * err;
        let level_prev = level;
        level = alpha * obs + (1.0 - alpha) * predicted;
        trend = beta * (level - level_prev) + (1.0 - beta) * phi * trend;
    }
    FilterState {
        mse: sse / y.len() as f64,
        level,
        trend,
    }
}

/// φ + φ² + … + φ^h.
fn damped_sum(phi: f64, h: usize) -> f64 {
    if (phi - 1.0).abs() < 1e-12 {
        h as f64
    } else {
        phi * (1.0 - phi.powi(h as i32)) / (1.0 - phi)
    }
}

fn series_scale(values: &[f64]) -> f64 {
    let abs: Vec<f64> = values.iter().map(|v| v.abs()).collect();
    match mean(&abs) {
        Some(m) if m > 0.0 && m.is_finite() => m,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damped_sum_matches_explicit_series() {
        let phi: f64 = 0.9;
        let explicit: f64 = (1..=5).map(|k| phi.powi(k)).sum();
        assert!((damped_sum(phi, 5) - explicit).abs() < 1e-12);
        assert_eq!(damped_sum(1.0, 7), 7.0);
    }

    #[test]
    fn filter_tracks_exact_line_without_error() {
        let y = [1.0, 2.0, 3.0, 4.0];
        let state = run_filter(&y, 0.5, 0.5, 1.0, 0.0, 1.0);
        assert!(state.mse < 1e-24);
        assert!((state.level - 4.0).abs() < 1e-12);
        assert!((state.trend - 1.0).abs() < 1e-12);
    }

    #[test]
    fn scale_falls_back_for_all_zero_series() {
        assert_eq!(series_scale(&[0.0, 0.0]), 1.0);
        assert!((series_scale(&[2.0, 4.0]) - 3.0).abs() < 1e-12);
    }
}
