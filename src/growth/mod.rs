//! Log-linear growth over a fixed window of years.
//!
//! For window values `v_0 … v_{n-1}` the estimator regresses `ln v_i` on
//! `i`, giving slope `b`. The score is the compounded change implied by the
//! fitted trend across the window span, `(exp(b (n - 1)) - 1) · 100`.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::error::{ExcludedEntity, GrowthError, Result};
use crate::math::stats::ols_on_index;
use crate::panel::ExtendedPanel;

pub const DEFAULT_WINDOW_START: i32 = 2025;
pub const DEFAULT_WINDOW_END: i32 = 2035;

/// Inclusive range of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    pub start: i32,
    pub end: i32,
}

impl Default for YearWindow {
    fn default() -> Self {
        Self {
            start: DEFAULT_WINDOW_START,
            end: DEFAULT_WINDOW_END,
        }
    }
}

impl YearWindow {
    pub fn new(start: i32, end: i32) -> Result<Self> {
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }

    pub fn len(&self) -> usize {
        let span = i64::from(self.end) - i64::from(self.start) + 1;
        usize::try_from(span.max(0)).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> Result<()> {
        if self.len() < 2 {
            return Err(GrowthError::InsufficientWindow { len: self.len() });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthEstimate {
    /// Slope of `ln v` against the 0-based index.
    pub log_slope: f64,
    /// Compounded change over the window span, in percent.
    pub window_pct: f64,
    /// Per-year compounding rate, in percent.
    pub annual_pct: f64,
}

/// Estimates growth of consecutive-year values.
pub fn estimate_growth(values: &[f64]) -> Result<GrowthEstimate> {
    let n = values.len();
    if n < 2 {
        return Err(GrowthError::InsufficientWindow { len: n });
    }
    if let Some((index, &value)) = values
        .iter()
        .enumerate()
        .find(|(_, v)| !(v.is_finite() && **v > 0.0))
    {
        return Err(GrowthError::NonPositiveValue { index, value });
    }

    let logs: Vec<f64> = values.iter().map(|v| v.ln()).collect();
    let line = ols_on_index(&logs).ok_or(GrowthError::InsufficientWindow { len: n })?;
    let b = line.slope;

    Ok(GrowthEstimate {
        log_slope: b,
        window_pct: (b * (n - 1) as f64).exp_m1() * 100.0,
        annual_pct: b.exp_m1() * 100.0,
    })
}

/// The growth score: compounded percentage change over the window.
pub fn growth_rate(values: &[f64]) -> Result<f64> {
    estimate_growth(values).map(|e| e.window_pct)
}

#[derive(Debug, Clone, Default)]
pub struct WindowGrowth {
    pub estimates: BTreeMap<String, GrowthEstimate>,
    pub excluded: Vec<ExcludedEntity>,
}

impl WindowGrowth {
    /// Entity → growth score.
    pub fn rates(&self) -> BTreeMap<String, f64> {
        self.estimates
            .iter()
            .map(|(entity, e)| (entity.clone(), e.window_pct))
            .collect()
    }
}

/// Applies the estimator to every entity of `panel` over `window`.
///
/// The window must lie inside the panel's years. Entities with empty or
/// non-positive cells in the window are excluded and reported.
pub fn growth_over_window(panel: &ExtendedPanel, window: YearWindow) -> Result<WindowGrowth> {
    window.validate()?;
    let (start, end) = match (panel.column_index(window.start), panel.column_index(window.end)) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(GrowthError::WindowOutOfRange {
                start: window.start,
                end: window.end,
                first: panel.first_year(),
                last: panel.last_year(),
            });
        }
    };

    let mut out = WindowGrowth::default();
    for row in panel.rows() {
        let estimate = window_values(&row.entity, window.start, &row.values[start..=end])
            .and_then(|values| estimate_growth(&values));
        match estimate {
            Ok(e) => {
                out.estimates.insert(row.entity.clone(), e);
            }
            Err(err) if err.is_entity_scoped() => {
                warn!(entity = %row.entity, reason = %err, "entity_growth_skipped");
                out.excluded.push(ExcludedEntity {
                    entity: row.entity.clone(),
                    reason: err,
                });
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        window_start = window.start,
        window_end = window.end,
        entities = out.estimates.len(),
        excluded = out.excluded.len(),
        "window_growth_ready"
    );
    Ok(out)
}

fn window_values(entity: &str, first_year: i32, cells: &[Option<f64>]) -> Result<Vec<f64>> {
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            cell.ok_or_else(|| GrowthError::MissingValue {
                entity: entity.to_string(),
                year: first_year + i as i32,
            })
        })
        .collect()
}
