use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::{Ctx, Exclusion};
use crate::forecast::forecast_series;
use crate::pipeline::Stage;

pub struct Stage3Forecast;

impl Stage3Forecast {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Forecast {
    fn name(&self) -> &'static str {
        "stage3_forecast"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let options = ctx.config.forecast_options();
        let threads = ctx.config.threads;
        let mut exclusions = Vec::new();

        for state in ctx.indicators_mut() {
            let panel = state
                .panel
                .as_ref()
                .with_context(|| format!("{} panel missing", state.indicator.name()))?;
            let series = state
                .series
                .as_ref()
                .with_context(|| format!("{} series missing", state.indicator.name()))?;
            let batch = forecast_series(panel, series, &options, threads)?;
            exclusions.extend(batch.excluded.iter().cloned().map(|excluded| Exclusion {
                indicator: state.indicator,
                stage: "forecast",
                excluded,
            }));
            info!(
                indicator = state.indicator.name(),
                fitted = batch.params.len(),
                excluded = batch.excluded.len(),
                last_year = batch.extended.last_year(),
                "indicator_forecast_ready"
            );
            state.forecast = Some(batch);
        }

        ctx.exclusions.extend(exclusions);
        Ok(())
    }
}
