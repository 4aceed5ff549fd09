use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::{ExcludedEntity, GrowthError, Result};
use crate::forecast::{ForecastOptions, ForecastResult, SmoothingParams, fit_and_forecast};
use crate::panel::{EntitySeries, ExtendedPanel, ExtendedRow, Panel, extract_series};

#[cfg(feature = "mt")]
use rayon::prelude::*;

/// A panel extended with forecasts, plus what happened to each entity.
#[derive(Debug, Clone)]
pub struct ForecastBatch {
    pub extended: ExtendedPanel,
    pub params: BTreeMap<String, SmoothingParams>,
    pub excluded: Vec<ExcludedEntity>,
}

/// Fits every entity independently and appends the forecast columns.
///
/// Forecast years at or before the panel's last year are dropped. Entities
/// whose fit fails keep their history, get empty forecast cells and are listed
/// in `excluded`. Structural errors abort.
pub fn forecast_panel(
    panel: &Panel,
    options: &ForecastOptions,
    threads: usize,
) -> Result<ForecastBatch> {
    let series = extract_series(panel)?;
    forecast_series(panel, &series, options, threads)
}

/// Same as [`forecast_panel`] for series already extracted from `panel`.
pub fn forecast_series(
    panel: &Panel,
    series: &BTreeMap<String, EntitySeries>,
    options: &ForecastOptions,
    threads: usize,
) -> Result<ForecastBatch> {
    options.validate()?;
    if series.len() != panel.len() {
        return Err(GrowthError::malformed(format!(
            "{} series extracted for {} panel rows",
            series.len(),
            panel.len()
        )));
    }
    let history_end = panel.last_year();
    let last_forecast_year = i32::try_from(options.horizon)
        .ok()
        .and_then(|h| history_end.checked_add(h))
        .ok_or_else(|| GrowthError::InvalidConfig {
            name: "horizon",
            reason: format!("{} years past {} is not a valid year", options.horizon, history_end),
        })?;
    let outcomes = fit_all(series, options, threads)?;

    let mut forecasts: BTreeMap<String, ForecastResult> = BTreeMap::new();
    let mut excluded = Vec::new();
    for (entity, outcome) in outcomes {
        match outcome {
            Ok(result) => {
                debug!(
                    entity = %entity,
                    alpha = result.params.alpha,
                    beta = result.params.beta,
                    phi = result.params.phi,
                    iterations = result.params.iterations,
                    "entity_forecast_ready"
                );
                forecasts.insert(entity, result);
            }
            Err(err) if err.is_entity_scoped() => {
                warn!(entity = %entity, reason = %err, "entity_forecast_failed");
                excluded.push(ExcludedEntity {
                    entity,
                    reason: err,
                });
            }
            Err(err) => return Err(err),
        }
    }

    let forecast_years: Vec<i32> = ((history_end + 1)..=last_forecast_year).collect();
    let mut years = panel.years().to_vec();
    years.extend(forecast_years.iter().copied());

    let mut rows = Vec::with_capacity(panel.len());
    for row in panel.rows() {
        let mut values: Vec<Option<f64>> = row.values.iter().map(|&v| Some(v)).collect();
        values.resize(years.len(), None);
        if let Some(result) = forecasts.get(&row.entity) {
            for (year, value) in result.points() {
                if year <= history_end || year > last_forecast_year {
                    continue;
                }
                let col = panel.years().len() + (year - history_end - 1) as usize;
                values[col] = Some(value);
            }
        }
        rows.push(ExtendedRow {
            entity: row.entity.clone(),
            values,
        });
    }

    let extended = ExtendedPanel::new(years, history_end, rows)?;
    let params = forecasts
        .into_iter()
        .map(|(entity, result)| (entity, result.params))
        .collect();

    info!(
        entities = panel.len(),
        excluded = excluded.len(),
        first_forecast_year = history_end + 1,
        last_forecast_year,
        "forecast_batch_ready"
    );

    Ok(ForecastBatch {
        extended,
        params,
        excluded,
    })
}

type FitOutcome = (String, Result<ForecastResult>);

#[cfg(feature = "mt")]
fn fit_all(
    series: &BTreeMap<String, EntitySeries>,
    options: &ForecastOptions,
    threads: usize,
) -> Result<Vec<FitOutcome>> {
    let jobs: Vec<&EntitySeries> = series.values().collect();
    let run = || -> Vec<FitOutcome> {
        jobs.par_iter()
            .map(|s| (s.entity().to_string(), fit_and_forecast(s, options)))
            .collect()
    };
    if threads == 0 {
        return Ok(run());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| GrowthError::InvalidConfig {
            name: "threads",
            reason: format!("failed to build thread pool: {}", e),
        })?;
    Ok(pool.install(run))
}

#[cfg(not(feature = "mt"))]
fn fit_all(
    series: &BTreeMap<String, EntitySeries>,
    options: &ForecastOptions,
    threads: usize,
) -> Result<Vec<FitOutcome>> {
    let _ = threads;
    Ok(series
        .values()
        .map(|s| (s.entity().to_string(), fit_and_forecast(s, options)))
        .collect())
}

impl ForecastBatch {
    pub fn is_excluded(&self, entity: &str) -> bool {
        self.excluded.iter().any(|e| e.entity == entity)
    }
}
